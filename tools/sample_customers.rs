//! Sample Customer Scorer
//!
//! Generates random customers and scores them offline against the configured
//! artifact bundle. Useful as a smoke test for a freshly exported model.
//!
//! Usage: sample-customers [count] [at_risk_rate] [show_every]

use anyhow::Result;
use churn_risk_scoring::{AppConfig, ChurnPipeline, RiskTier};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

const INTERNET_ADDONS: [&str; 6] = [
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
];

/// Customer generator for testing
struct CustomerGenerator {
    rng: rand::rngs::ThreadRng,
}

impl CustomerGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Long-tenure customer on a term contract
    fn generate_loyal(&mut self) -> HashMap<String, String> {
        let tenure = self.rng.gen_range(24..72);
        let contract = self.random_choice(&["One year", "Two year"]);
        let payment = self.random_choice(&[
            "Bank transfer (automatic)",
            "Credit card (automatic)",
            "Mailed check",
        ]);
        let addon_rate = 0.7;
        self.build(tenure, contract, payment, addon_rate)
    }

    /// New month-to-month customer paying by electronic check
    fn generate_at_risk(&mut self) -> HashMap<String, String> {
        let tenure = self.rng.gen_range(0..12);
        let payment = self.random_choice(&["Electronic check", "Mailed check"]);
        let addon_rate = 0.2;
        self.build(tenure, "Month-to-month", payment, addon_rate)
    }

    fn build(
        &mut self,
        tenure: i64,
        contract: &str,
        payment: &str,
        addon_rate: f64,
    ) -> HashMap<String, String> {
        let mut form = HashMap::new();
        let mut set = |key: &str, value: String| {
            form.insert(key.to_string(), value);
        };

        set("gender", self.random_choice(&["Female", "Male"]).to_string());
        set("SeniorCitizen", (self.rng.gen_bool(0.16) as u8).to_string());
        set("Partner", self.yes_no(0.5));
        set("Dependents", self.yes_no(0.3));
        set("tenure", tenure.to_string());

        let phone = self.rng.gen_bool(0.9);
        set("PhoneService", if phone { "Yes" } else { "No" }.to_string());
        let lines = if phone {
            self.yes_no(0.4)
        } else {
            "No phone service".to_string()
        };
        set("MultipleLines", lines);

        let internet = self.random_choice(&["DSL", "Fiber optic", "No"]);
        set("InternetService", internet.to_string());
        for addon in INTERNET_ADDONS {
            let value = if internet == "No" {
                "No internet service".to_string()
            } else {
                self.yes_no(addon_rate)
            };
            set(addon, value);
        }

        set("Contract", contract.to_string());
        set("PaperlessBilling", self.yes_no(0.6));
        set("PaymentMethod", payment.to_string());

        let monthly: f64 = match internet {
            "Fiber optic" => self.rng.gen_range(70.0..118.0),
            "DSL" => self.rng.gen_range(25.0..90.0),
            _ => self.rng.gen_range(18.0..26.0),
        };
        let monthly = (monthly * 100.0).round() / 100.0;
        set("MonthlyCharges", format!("{:.2}", monthly));
        // Leave some totals blank so the derivation path is exercised
        if self.rng.gen_bool(0.8) {
            set("TotalCharges", format!("{:.2}", monthly * tenure as f64));
        }

        form
    }

    fn yes_no(&mut self, p_yes: f64) -> String {
        if self.rng.gen_bool(p_yes) { "Yes" } else { "No" }.to_string()
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_customers=info".parse()?)
                .add_directive("churn_risk_scoring=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let count: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
    let at_risk_rate: f64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0.3);
    let show_every: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(25);

    let config = AppConfig::load()?;
    let pipeline = ChurnPipeline::from_config(&config.artifacts)?;
    info!(
        model = %pipeline.model_name(),
        features = pipeline.feature_count(),
        count = count,
        at_risk_rate = at_risk_rate,
        "Scoring sample customers"
    );

    let mut generator = CustomerGenerator::new();
    let mut rng = rand::thread_rng();
    let mut by_tier: BTreeMap<RiskTier, u64> = BTreeMap::new();
    let mut failures = 0u64;

    for i in 0..count {
        let at_risk = rng.gen_bool(at_risk_rate);
        let form = if at_risk {
            generator.generate_at_risk()
        } else {
            generator.generate_loyal()
        };

        match pipeline.score(&form) {
            Ok(result) => {
                *by_tier.entry(result.risk_tier).or_insert(0) += 1;
                if show_every > 0 && (i + 1) % show_every == 0 {
                    info!(
                        sample = i + 1,
                        at_risk = at_risk,
                        probability = %result.probability_display(),
                        "{}",
                        result.label
                    );
                }
            }
            Err(e) => {
                failures += 1;
                warn!(sample = i + 1, error_kind = e.kind(), "{}", e.display_message());
            }
        }
    }

    info!("Completed! Scored {} customers ({} failed)", count, failures);
    for (tier, n) in &by_tier {
        let pct = if count > 0 {
            *n as f64 / count as f64 * 100.0
        } else {
            0.0
        };
        info!("  {:<6}: {:>6} ({:>5.1}%)", tier.as_str(), n, pct);
    }

    Ok(())
}
