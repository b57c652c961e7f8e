use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::BindingConfig;
use crate::descriptor::{AbiMethod, AbiTable, NativeMethod};
use crate::error::BindingError;
use crate::matcher::find_matching_abi_method_with;
use crate::report::{BindReport, Binding, MethodOutcome, OutcomeStatus};
use crate::returns::validate_outputs;
use crate::validator::validate_arg;

/// Checks a native method against the ABI method it implements: return
/// shape first, then argument count, then each argument by position.
pub fn validate_method(native: &NativeMethod, abi: &AbiMethod) -> Result<(), BindingError> {
    validate_outputs(native, abi)?;

    if native.params.len() != abi.inputs.len() {
        return Err(BindingError::ParamCountMismatch {
            abi_method: abi.name.clone(),
            expected: abi.inputs.len(),
            impl_method: native.name.clone(),
            actual: native.params.len(),
        });
    }

    for (index, (param, input)) in native.params.iter().zip(&abi.inputs).enumerate() {
        validate_arg(param, input).map_err(|source| BindingError::ParamMismatch {
            impl_method: native.name.clone(),
            abi_method: abi.name.clone(),
            index,
            source: Box::new(source),
        })?;
    }
    Ok(())
}

/// Binds the methods of one precompile implementation to its ABI.
pub struct Binder {
    table: AbiTable,
    config: BindingConfig,
}

impl Binder {
    pub fn new(table: AbiTable, config: BindingConfig) -> Self {
        Self { table, config }
    }

    /// Binder with the default configuration
    pub fn with_table(table: AbiTable) -> Self {
        Self::new(table, BindingConfig::default())
    }

    /// Finds the ABI method `native` implements under the configured policy.
    pub fn find_match(&self, native: &NativeMethod) -> Result<Option<&AbiMethod>, BindingError> {
        let matched = find_matching_abi_method_with(native, &self.table, self.config.matching.policy)?;
        Ok(matched.and_then(|name| self.table.get(&name)))
    }

    /// Matches and validates one method.
    ///
    /// `Ok(None)` means no ABI method matched and the method is not exposed.
    ///
    /// # Panics
    ///
    /// Panics when the matched ABI method declares no outputs.
    pub fn bind_method(&self, native: &NativeMethod) -> Result<Option<Binding>, BindingError> {
        let Some(abi) = self.find_match(native)? else {
            debug!(native = %native.name, "no matching ABI method, not exposed");
            return Ok(None);
        };
        debug!(native = %native.name, abi = %abi.name, "matched ABI method");

        validate_method(native, abi)?;
        Ok(Some(Binding {
            native_method: native.name.clone(),
            abi_method: abi.name.clone(),
        }))
    }

    /// Binds every method of a precompile and collects the outcomes.
    ///
    /// Methods are validated independently; outcomes are ordered by native
    /// method name. When two methods bind the same ABI method, the first by
    /// name keeps it and the second fails with
    /// [`BindingError::DuplicateBinding`].
    pub fn bind_all(&self, precompile: &str, methods: &[NativeMethod]) -> BindReport {
        let start = Instant::now();
        let mut report = BindReport::new(precompile, self.config.matching.policy);

        let mut outcomes: Vec<MethodOutcome> = methods.par_iter().map(|m| self.outcome_for(m)).collect();
        outcomes.sort_by(|a, b| a.native_method.cmp(&b.native_method));
        report.outcomes = outcomes;

        let mut bound: BTreeMap<String, String> = BTreeMap::new();
        for outcome in report.outcomes.iter_mut().filter(|o| o.status == OutcomeStatus::Bound) {
            let Some(abi_method) = outcome.abi_method.clone() else {
                continue;
            };
            match bound.get(&abi_method) {
                Some(first) => {
                    warn!(abi = %abi_method, first = %first, second = %outcome.native_method, "duplicate binding");
                    outcome.status = OutcomeStatus::Failed;
                    outcome.error = Some(BindingError::DuplicateBinding {
                        abi_method,
                        first: first.clone(),
                        second: outcome.native_method.clone(),
                    });
                }
                None => {
                    bound.insert(abi_method, outcome.native_method.clone());
                }
            }
        }

        let unbound: Vec<String> = self
            .table
            .names()
            .filter(|name| !bound.contains_key(*name))
            .map(str::to_string)
            .collect();
        if self.config.binding.require_complete {
            for abi_method in &unbound {
                warn!(abi = %abi_method, "ABI method has no implementation");
                report.errors.push(BindingError::UnimplementedAbiMethod {
                    abi_method: abi_method.clone(),
                });
            }
        }
        report.unbound_abi_methods = unbound;
        report.set_total_duration(start.elapsed());

        if report.is_ok() {
            info!(
                precompile,
                bound = report.count(OutcomeStatus::Bound),
                skipped = report.count(OutcomeStatus::Unexposed),
                "precompile binding complete"
            );
        } else {
            warn!(
                precompile,
                failed = report.count(OutcomeStatus::Failed),
                errors = report.errors.len(),
                "precompile binding failed"
            );
        }
        report
    }

    fn outcome_for(&self, native: &NativeMethod) -> MethodOutcome {
        if self.config.should_ignore(&native.name) {
            debug!(native = %native.name, "ignored by configuration");
            return MethodOutcome::ignored(&native.name);
        }

        let abi = match self.find_match(native) {
            Ok(Some(abi)) => abi,
            Ok(None) => {
                debug!(native = %native.name, "no matching ABI method, not exposed");
                return MethodOutcome::unexposed(&native.name);
            }
            Err(err) => {
                warn!(native = %native.name, error = %err, "method matching failed");
                return MethodOutcome::failed(&native.name, None, err);
            }
        };

        match validate_method(native, abi) {
            Ok(()) => {
                info!(native = %native.name, abi = %abi.name, "bound precompile method");
                MethodOutcome::bound(Binding {
                    native_method: native.name.clone(),
                    abi_method: abi.name.clone(),
                })
            }
            Err(err) => {
                warn!(native = %native.name, abi = %abi.name, error = %err, "method validation failed");
                MethodOutcome::failed(&native.name, Some(abi.name.clone()), err)
            }
        }
    }
}
