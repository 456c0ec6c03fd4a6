//! # Viewer Primitives
//!
//! Hardcoded constants shared by the engine.
//!
//! Colors are CSS strings because the drawing surface consumes them verbatim.

/// Labels longer than this many characters are truncated for display.
pub const LABEL_LENGTH_THRESHOLD: usize = 30;

/// Appended to truncated labels and to clipped search snippets.
pub const ELLIPSIS: &str = "...";

/// Color of nodes and edges outside the current focus.
pub const DIM_COLOR: &str = "rgba(220,220,220,0.7)";

/// Color of selected nodes and base path edges.
pub const SELECTED_NODE_COLOR: &str = "rgba(70,130,180,0.9)";

/// Color of the query node.
pub const QUERY_NODE_COLOR: &str = "rgb(255,94,25)";

/// Tint of overlay edges lying on the highlighted path.
pub const EXTRA_SELECTED_COLOR: &str = "rgba(255,94,25,0.7)";

/// Node color used when the network data carries none.
pub const DEFAULT_NODE_COLOR: &str = "rgb(120,120,120)";

/// Edge color used when the network data carries none.
pub const DEFAULT_EDGE_COLOR: &str = "rgb(200,200,200)";

/// Label sentinel of overlay edges.
pub const EXTRA_EDGE_LABEL: &str = "extra";

/// Weight given to overlay edges (lighter than any base edge).
pub const EXTRA_EDGE_WEIGHT: f64 = 0.8;

/// Characters of context kept on each side of a search match.
pub const SNIPPET_RADIUS: usize = 20;

/// Network loaded at startup and the only one with a subnetwork view.
pub const DEFAULT_NETWORK: &str = "NeXO";

/// Placeholder for empty detail-panel values.
pub const EMPTY_RECORD: &str = "N/A";

/// Record field never searched (it is shown in its own column).
pub const LABEL_FIELD: &str = "label";

/// Base URL of QuickGO term pages.
pub const QUICK_GO_API: &str = "http://www.ebi.ac.uk/QuickGO/GTerm?id=";

/// Base URL of SGD locus pages.
pub const SGD_API: &str = "http://www.yeastgenome.org/cgi-bin/locus.fpl?dbid=";

/// Indicator rendered when a search yields nothing.
pub const NO_MATCH: &str = "No Match!";
