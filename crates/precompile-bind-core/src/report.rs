use colored::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::BindingError;
use crate::matcher::MatchPolicy;

/// A native method wired to the ABI method it implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub native_method: String,
    pub abi_method: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Matched and validated
    Bound,
    /// No ABI method matched; not an exposed endpoint
    Unexposed,
    /// Skipped by configuration
    Ignored,
    Failed,
}

/// Outcome of binding a single native method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodOutcome {
    pub native_method: String,
    pub abi_method: Option<String>,
    pub status: OutcomeStatus,
    pub error: Option<BindingError>,
}

impl MethodOutcome {
    pub fn bound(binding: Binding) -> Self {
        Self {
            native_method: binding.native_method,
            abi_method: Some(binding.abi_method),
            status: OutcomeStatus::Bound,
            error: None,
        }
    }

    pub fn unexposed(native_method: impl Into<String>) -> Self {
        Self {
            native_method: native_method.into(),
            abi_method: None,
            status: OutcomeStatus::Unexposed,
            error: None,
        }
    }

    pub fn ignored(native_method: impl Into<String>) -> Self {
        Self {
            native_method: native_method.into(),
            abi_method: None,
            status: OutcomeStatus::Ignored,
            error: None,
        }
    }

    pub fn failed(native_method: impl Into<String>, abi_method: Option<String>, error: BindingError) -> Self {
        Self {
            native_method: native_method.into(),
            abi_method,
            status: OutcomeStatus::Failed,
            error: Some(error),
        }
    }
}

/// Full report produced after binding every method of one precompile.
#[derive(Debug, Clone, Serialize)]
pub struct BindReport {
    pub precompile: String,
    pub policy: MatchPolicy,
    pub outcomes: Vec<MethodOutcome>,
    /// Failures not tied to one native method: missing implementations
    pub errors: Vec<BindingError>,
    pub unbound_abi_methods: Vec<String>,
    pub total_duration_ms: u128,
}

impl BindReport {
    pub fn new(precompile: impl Into<String>, policy: MatchPolicy) -> Self {
        Self {
            precompile: precompile.into(),
            policy,
            outcomes: Vec::new(),
            errors: Vec::new(),
            unbound_abi_methods: Vec::new(),
            total_duration_ms: 0,
        }
    }

    pub fn set_total_duration(&mut self, duration: Duration) {
        self.total_duration_ms = duration.as_millis();
    }

    /// True when the precompile may be activated.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.count(OutcomeStatus::Failed) == 0
    }

    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// The dispatch entries, in native method order.
    pub fn bindings(&self) -> Vec<Binding> {
        self.outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Bound)
            .filter_map(|o| {
                o.abi_method.as_ref().map(|abi| Binding {
                    native_method: o.native_method.clone(),
                    abi_method: abi.clone(),
                })
            })
            .collect()
    }

    /// Every failure in the report, per-method ones first.
    pub fn all_errors(&self) -> Vec<&BindingError> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref())
            .chain(self.errors.iter())
            .collect()
    }

    /// Pretty-print the report to stdout.
    pub fn print_human(&self) {
        println!("═══════════════════════════════════════════");
        println!("  PRECOMPILE BINDING REPORT");
        println!("  Precompile: {}", self.precompile);
        println!("  Match policy: {}", self.policy);
        println!("═══════════════════════════════════════════");
        println!();

        for outcome in &self.outcomes {
            match outcome.status {
                OutcomeStatus::Bound => println!(
                    "  {} {} → {}",
                    "[BOUND]".green().bold(),
                    outcome.native_method,
                    outcome.abi_method.as_deref().unwrap_or_default()
                ),
                OutcomeStatus::Unexposed => {
                    println!("  {} {}", "[SKIP]".cyan(), outcome.native_method)
                }
                OutcomeStatus::Ignored => {
                    println!("  {} {}", "[IGNORED]".dimmed(), outcome.native_method)
                }
                OutcomeStatus::Failed => {
                    println!("  {} {}", "[FAILED]".red().bold(), outcome.native_method)
                }
            }
            if let Some(err) = &outcome.error {
                println!("      └─ {}", err);
            }
        }

        if !self.errors.is_empty() {
            println!();
            for err in &self.errors {
                println!("  {} {}", "[ERROR]".red().bold(), err);
            }
        }

        if !self.unbound_abi_methods.is_empty() {
            println!();
            println!("  Unbound ABI methods: {}", self.unbound_abi_methods.join(", "));
        }

        println!();
        println!("───────────────────────────────────────────");
        println!(
            "  Bound: {}  |  Skipped: {}  |  Ignored: {}  |  Failed: {}",
            self.count(OutcomeStatus::Bound),
            self.count(OutcomeStatus::Unexposed),
            self.count(OutcomeStatus::Ignored),
            self.count(OutcomeStatus::Failed)
        );
        println!("  Duration: {}ms", self.total_duration_ms);

        let verdict = if self.is_ok() {
            "Precompile can be activated".green().bold()
        } else {
            "Precompile must not be activated".red().bold()
        };
        println!("  {}", verdict);
        println!("═══════════════════════════════════════════");
    }

    /// Return the report as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
