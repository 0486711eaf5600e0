use strum_macros::IntoStaticStr;

use reliability_api::config::Severity;

use super::pool::PoolKey;

/// Node of a reliability tree.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ReliabilityNode {
    /// Fails when any child fails.
    Serial(Link),

    /// Fails when every child has failed.
    Parallel(Link),

    /// Catalogue component, always a leaf.
    Component(Component),
}

/// Structural node grouping children in series or in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub label: Option<String>,
    pub children: Vec<PoolKey>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Component id, doubling as the node label.
    pub id: String,

    /// Bill of materials marker used to look up the k-factor of the component.
    pub marker: Option<i64>,

    pub severity: Severity,

    /// Failures per 10^6 hours.
    failure_rate: Option<f64>,
}

impl Component {
    pub fn new(id: impl Into<String>, marker: Option<i64>) -> Self {
        Self {
            id: id.into(),
            marker,
            severity: Severity::default(),
            failure_rate: None,
        }
    }

    /// Raw failure rate, in failures per 10^6 hours.
    pub fn failure_rate(&self) -> Option<f64> {
        self.failure_rate
    }

    pub fn set_failure_rate(&mut self, failure_rate: f64) {
        self.failure_rate = Some(failure_rate);
    }

    pub fn clear_failure_rate(&mut self) {
        self.failure_rate = None;
    }
}

impl ReliabilityNode {
    pub fn new_serial(label: Option<impl Into<String>>, children: Vec<PoolKey>) -> Self {
        Self::Serial(Link {
            label: label.map(Into::into),
            children,
            severity: Severity::default(),
        })
    }

    pub fn new_parallel(label: Option<impl Into<String>>, children: Vec<PoolKey>) -> Self {
        Self::Parallel(Link {
            label: label.map(Into::into),
            children,
            severity: Severity::default(),
        })
    }

    pub fn new_component(id: impl Into<String>, marker: Option<i64>) -> Self {
        Self::Component(Component::new(id, marker))
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Serial(link) | Self::Parallel(link) => link.label.as_deref(),
            Self::Component(component) => Some(&component.id),
        }
    }

    /// Child keys, empty for components.
    pub fn children(&self) -> &[PoolKey] {
        match self {
            Self::Serial(link) | Self::Parallel(link) => &link.children,
            Self::Component(_) => &[],
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Serial(link) | Self::Parallel(link) => link.severity,
            Self::Component(component) => component.severity,
        }
    }

    pub fn set_severity(&mut self, severity: Severity) {
        match self {
            Self::Serial(link) | Self::Parallel(link) => link.severity = severity,
            Self::Component(component) => component.severity = severity,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut Component> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self, Self::Component(_))
    }

    /// Short description for logging, e.g. `serial 'Substation'` or `parallel (unlabeled)`.
    pub fn describe(&self) -> String {
        let kind: &'static str = self.into();
        match self.label() {
            Some(label) => format!("{kind} '{label}'"),
            None => format!("{kind} (unlabeled)"),
        }
    }
}
