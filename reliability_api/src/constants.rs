// Reserved labels

/// Label and pool key of the root node.
pub const ARRAY_LABEL: &str = "array";

/// Prefix shared by every device node id.
pub const DEVICE_PREFIX: &str = "device";

/// Prefix shared by every subhub node id.
pub const SUBHUB_PREFIX: &str = "subhub";

/// Structural keywords that may not appear in a subsystem query.
pub const RESERVED_KEYWORDS: [&str; 3] = [DEVICE_PREFIX, SUBHUB_PREFIX, ARRAY_LABEL];

/// Key of the layout entry in array and subhub records.
pub const LAYOUT_KEY: &str = "layout";

/// Placeholder id for an absent component.
pub const DUMMY_COMPONENT: &str = "dummy";

// Electrical systems

pub const EXPORT_CABLE: &str = "Export cable";
pub const SUBSTATION: &str = "Substation";
pub const ELEC_SUBSYSTEM: &str = "Elec sub-system";

/// Systems attached to the array root, in order.
pub const ARRAY_SYSTEMS: [&str; 2] = [EXPORT_CABLE, SUBSTATION];

/// Systems attached to a subhub, in order.
pub const SUBHUB_SYSTEMS: [&str; 2] = [ELEC_SUBSYSTEM, SUBSTATION];

// Moorings and foundation systems

pub const SUBSTATION_FOUNDATION: &str = "Substation foundation";
pub const UMBILICAL: &str = "Umbilical";
pub const MOORING_SYSTEM: &str = "Mooring system";
pub const FOUNDATION: &str = "Foundation";
pub const STATION_KEEPING: &str = "Station keeping";
pub const MOORING_LINES: &str = "Moorings lines";

// User systems

pub const DUMMY_SUBSYSTEM: &str = "Dummy sub-system";

// Device groups, in the order they are wired into a device

pub const MOORINGS_GROUP: &str = "M&F sub-system";
pub const ELECTRICAL_GROUP: &str = "Array elec sub-system";
pub const USER_GROUP: &str = "User sub-systems";

/// Subsystems whose failure curtails every device downstream in the same string.
pub const CURTAILING_SUBSYSTEMS: [&str; 2] = [ELECTRICAL_GROUP, ELEC_SUBSYSTEM];

// Failure rates

/// Components that are designed rather than catalogued. They get a generic failure rate.
pub const DESIGNED_COMPONENTS: [&str; 8] = [
    DUMMY_COMPONENT,
    "n/a",
    "ideal",
    "gravity",
    "shallowfoundation",
    "suctioncaisson",
    "directembedment",
    "grout",
];

/// Failure rate of designed components, in failures per 10^6 hours.
pub const DESIGNED_FAILURE_RATE: f64 = 10.0 / 876.0;

/// Catalogue failure rates are quoted per this many hours.
pub const FAILURE_RATE_UNIT_HOURS: f64 = 1e6;

/// Hours per year used to annualise failure probabilities.
pub const HOURS_PER_YEAR: f64 = 365.25 * 24.0;

/// Installation types whose cable quantity is a length in metres.
pub const LENGTH_SCALED_INSTALLATIONS: [&str; 2] = ["array", "export"];
