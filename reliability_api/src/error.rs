use std::fmt::{Debug, Write};
use std::{borrow::Cow, panic::Location};

use serde::{ser::SerializeStruct, Deserialize, Serialize};
use strum_macros::IntoStaticStr;

/// User provided input was invalid.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidInputError {
    #[error("Failed to load network definition from '{path}'")]
    LoadNetworkDefinition { path: String },
    #[error("Failed to parse network definition")]
    ParseNetworkDefinition,
    #[error("Failed to load component database from '{path}'")]
    LoadComponentDatabase { path: String },
    #[error("Failed to parse component database")]
    ParseComponentDatabase,
    #[error("At least one network input must be provided")]
    NoSubNetworks,
    #[error("Unique nodes detected in hierarchies: {nodes}")]
    MismatchedNodes { nodes: String },
    #[error("Hierarchy has no '{node}' node")]
    MissingNode { node: String },
    #[error("Layout of '{parent}' references unknown node '{node}'")]
    UnknownLayoutNode { parent: String, node: String },
    #[error("Layout of '{node}' contains itself")]
    CyclicLayout { node: String },
    #[error("Markers of system '{system}' in node '{node}' do not match its components")]
    MarkerShapeMismatch { node: String, system: String },
    #[error("Invalid severity level '{value}'")]
    UnknownSeverityLevel { value: String },
    #[error("Invalid scenario '{value}'")]
    UnknownScenario { value: String },
    #[error("Subsystem name '{name}' may not contain reserved keyword '{keyword}'")]
    ReservedSubsystemName { name: String, keyword: String },
}

/// The component database could not satisfy a failure rate request.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseError {
    #[error("Component '{id}' is not in the database")]
    UnknownComponent { id: String },
    #[error("No failure rate data is set for component '{id}'")]
    NoFailureRateData { id: String },
}

/// A label or key lookup over the reliability pool failed.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum SearchError {
    #[error("One label expected, but none found for '{label}'")]
    NoMatch { label: String },
    #[error("One label expected, but {count} found for '{label}'")]
    MultipleMatches { label: String, count: usize },
    #[error("Shortest path for '{label}' is not unique, {count} candidates found")]
    AmbiguousShortestPath { label: String, count: usize },
    #[error("Pool has no node with key '{key}'")]
    UnknownKey { key: String },
}

#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum InternalError {
    #[error("Internal error: {0}")]
    Internal(&'static str),
}

/// Each variant of `ErrorKind` corresponds to a different category of error. The categories are
/// intended to be user-meaningful: input problems are fixed by the caller, database problems by
/// whoever curates the component catalogue.
#[derive(Debug, Eq, thiserror::Error, IntoStaticStr, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// The network definition or one of the query arguments was invalid.
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    /// Failure rate data could not be resolved for a component.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// A label or key search did not produce the expected result.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// A bug was encountered.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Debug)]
struct ReliabilityErrorInner {
    kind: ErrorKind,
    location: &'static Location<'static>,
    source: Option<anyhow::Error>,
    context: Vec<(Cow<'static, str>, &'static Location<'static>)>,
}

pub struct ReliabilityError(Box<ReliabilityErrorInner>);
impl ReliabilityError {
    #[track_caller]
    pub fn new(kind: impl Into<ErrorKind>) -> Self {
        ReliabilityError(Box::new(ReliabilityErrorInner {
            kind: kind.into(),
            location: Location::caller(),
            source: None,
            context: Vec::new(),
        }))
    }

    pub fn unstructured(self, context: impl Into<Cow<'static, str>>) -> anyhow::Error {
        match self.0.source {
            Some(source) => source.context(self.0.kind).context(context.into()),
            None => anyhow::Error::from(self.0.kind).context(context.into()),
        }
    }

    /// Returns a reference to the inner ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }
}

impl std::fmt::Display for ReliabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.kind)
    }
}

pub trait ReportError<T, K> {
    /// Convert this error into a structured ReliabilityError.
    fn structured(self, kind: K) -> Result<T, ReliabilityError>;
}

impl<T, K> ReportError<T, K> for Option<T>
where
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(self, kind: K) -> Result<T, ReliabilityError> {
        match self {
            Some(t) => Ok(t),
            None => Err(ReliabilityError(Box::new(ReliabilityErrorInner {
                kind: kind.into(),
                location: Location::caller(),
                source: None,
                context: Vec::new(),
            }))),
        }
    }
}

impl<T, E, K> ReportError<T, K> for Result<T, E>
where
    E: Into<anyhow::Error>,
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(self, kind: K) -> Result<T, ReliabilityError> {
        match self {
            Ok(o) => Ok(o),
            Err(e) => Err(ReliabilityError(Box::new(ReliabilityErrorInner {
                kind: kind.into(),
                location: Location::caller(),
                source: Some(e.into()),
                context: Vec::new(),
            }))),
        }
    }
}

pub trait ReliabilityResultExt<T> {
    /// Attach a context message to the error.
    fn message(self, context: impl Into<Cow<'static, str>>) -> Result<T, ReliabilityError>;

    /// Convert the error into an unstructured error.
    fn unstructured(self, context: impl Into<Cow<'static, str>>) -> Result<T, anyhow::Error>;
}
impl<T> ReliabilityResultExt<T> for Result<T, ReliabilityError> {
    #[track_caller]
    fn message(mut self, context: impl Into<Cow<'static, str>>) -> Result<T, ReliabilityError> {
        if let Err(ref mut e) = self {
            e.0.context.push((context.into(), Location::caller()));
        }
        self
    }

    fn unstructured(self, context: impl Into<Cow<'static, str>>) -> Result<T, anyhow::Error> {
        self.map_err(|e| e.unstructured(context))
    }
}

impl Serialize for ReliabilityError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("reliability-error", 5)?;
        state.serialize_field("message", &self.0.kind.to_string())?;
        match self.0.kind {
            ErrorKind::InvalidInput(ref e) => state.serialize_field("error", e)?,
            ErrorKind::Database(ref e) => state.serialize_field("error", e)?,
            ErrorKind::Search(ref e) => state.serialize_field("error", e)?,
            ErrorKind::Internal(ref e) => state.serialize_field("error", e)?,
        }
        state.serialize_field("category", <&str>::from(&self.0.kind))?;
        state.serialize_field(
            "location",
            &format!("{}:{}", self.0.location.file(), self.0.location.line()),
        )?;
        match self.0.source {
            Some(ref e) => state.serialize_field("cause", &Some(format!("{:?}", e)))?,
            None => state.serialize_field("cause", &None::<String>)?,
        }
        state.end()
    }
}

impl Debug for ReliabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.0.kind,
            self.0.location.file(),
            self.0.location.line()
        )?;

        if !self.0.context.is_empty() {
            writeln!(f, "\n\nContext:")?;
            for (i, (context, location)) in self.0.context.iter().enumerate() {
                for (j, line) in context.split('\n').enumerate() {
                    if j == 0 {
                        write!(f, "{: >5}: ", i)?;
                    } else {
                        f.write_str("\n       ")?;
                    }
                    f.write_str(line)?;
                }
                writeln!(f, " at {}:{}", location.file(), location.line())?;
            }
        }

        if let Some(ref source) = self.0.source {
            writeln!(f, "\n\nCaused by:")?;
            let mut index = 0;
            let mut source: Option<&dyn std::error::Error> = Some(source.as_ref());
            while let Some(e) = source {
                for (i, line) in e.to_string().split('\n').enumerate() {
                    if i == 0 {
                        write!(f, "{: >5}: ", index)?;
                    } else {
                        f.write_str("\n       ")?;
                    }
                    f.write_str(line)?;
                }
                f.write_char('\n')?;
                source = e.source();
                index += 1;
            }
        }
        Ok(())
    }
}
