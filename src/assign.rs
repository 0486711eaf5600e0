//! Assignment of catalogue failure rates to the components of a pool.

use log::{debug, info, trace};

use reliability_api::{
    config::{ComponentDatabase, KFactors, Scenario, Severity},
    constants::{DESIGNED_COMPONENTS, DESIGNED_FAILURE_RATE},
    error::{DatabaseError, ReliabilityError, ReportError},
};

use crate::graph::Pool;

/// Failure rate resolved for a component and the severity of the table it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRate {
    /// Failures per 10^6 hours.
    pub failure_rate: f64,
    pub severity: Severity,
}

/// Sets the failure rate and severity of every component in the pool.
///
/// Designed components get a generic rate. Catalogue components read the requested severity's
/// table, falling back to its mean, then to the other severity's table and its mean; the
/// component's severity records which table was used. When `k_factors` holds the component's
/// marker, the catalogue rate is scaled by it.
pub fn assign_failure_rates(
    pool: &mut Pool,
    database: &ComponentDatabase,
    severity: Severity,
    scenario: Scenario,
    k_factors: Option<&KFactors>,
) -> Result<(), ReliabilityError> {
    debug!("Assigning {severity} failure rates for the {scenario} scenario");

    let mut assigned = 0;
    for (key, node) in pool.iter_mut() {
        let Some(component) = node.as_component_mut() else {
            continue;
        };

        let mut resolved = resolve_failure_rate(database, &component.id, severity, scenario)?;
        if !is_designed(&component.id) {
            if let Some(k_factor) = component.marker.and_then(|m| k_factors?.get(m)) {
                trace!(
                    "Scaling failure rate of '{}' by k-factor {k_factor}",
                    component.id
                );
                resolved.failure_rate *= k_factor;
            }
        }

        trace!(
            "Component '{}' at key '{key}': {} failures per 10^6 hours ({})",
            component.id,
            resolved.failure_rate,
            resolved.severity
        );
        component.set_failure_rate(resolved.failure_rate);
        component.severity = resolved.severity;
        assigned += 1;
    }

    debug!("Assigned failure rates to {assigned} components");
    Ok(())
}

fn is_designed(id: &str) -> bool {
    DESIGNED_COMPONENTS.contains(&id)
}

/// Resolves the failure rate of a single component.
pub fn resolve_failure_rate(
    database: &ComponentDatabase,
    id: &str,
    severity: Severity,
    scenario: Scenario,
) -> Result<ResolvedRate, ReliabilityError> {
    if is_designed(id) {
        return Ok(ResolvedRate {
            failure_rate: DESIGNED_FAILURE_RATE,
            severity,
        });
    }

    let rates = &database
        .get(id)
        .structured(DatabaseError::UnknownComponent { id: id.to_string() })?
        .failure_rates;

    if let Some(failure_rate) = rates
        .rate(severity, scenario)
        .or_else(|| rates.rate(severity, Scenario::Mean))
    {
        return Ok(ResolvedRate {
            failure_rate,
            severity,
        });
    }

    let other = severity.other();
    if let Some(failure_rate) = rates
        .rate(other, scenario)
        .or_else(|| rates.rate(other, Scenario::Mean))
    {
        info!("No {severity} failure rate for component '{id}', using {other} data");
        return Ok(ResolvedRate {
            failure_rate,
            severity: other,
        });
    }

    Err(ReliabilityError::new(DatabaseError::NoFailureRateData {
        id: id.to_string(),
    }))
}
