//! # Node Details
//!
//! The detail-panel model built from a fetched record.
//!
//! Three layouts exist: NeXO terms (scores, per-ontology annotations and the
//! assigned gene list), GO terms (definition plus a gene table resolved by a
//! follow-up names lookup) and genes (SGD identifiers and description).

use crate::formats::{GeneRecord, InteractionsResponse, OntologyTermRecord, Record};
use crate::primitives::{EMPTY_RECORD, QUICK_GO_API, SGD_API};
use crate::NodeId;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Display names of the GO namespaces, keyed by their short code.
pub const CATEGORY_MAP: [(&str, &str); 3] = [
    ("bp", "Biological Process"),
    ("cc", "Cellular Component"),
    ("mf", "Molecular Function"),
];

/// Display name of a GO namespace code (`bp`, `cc`, `mf`).
#[must_use]
pub fn category_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_lowercase();
    CATEGORY_MAP
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, name)| *name)
}

// =============================================================================
// PANEL MODEL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DetailValue {
    Text(String),
    Link { text: String, href: String },
    List(Vec<String>),
}

impl DetailValue {
    fn text_or_empty(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::Text(v.to_string()),
            _ => Self::Text(EMPTY_RECORD.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: String,
    pub value: DetailValue,
}

impl DetailRow {
    fn new(label: &str, value: DetailValue) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSection {
    pub title: String,
    pub rows: Vec<DetailRow>,
}

/// One row of the GO term gene table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneRow {
    pub sgd_id: String,
    pub symbol: String,
    pub orf: String,
    pub link: String,
}

/// Gene table of a GO term, filled by a names lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GeneTable {
    None,
    Pending { names: Vec<String> },
    Loaded { rows: Vec<GeneRow> },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelKind {
    NexoTerm,
    GoTerm,
    Gene,
}

/// GO alignment score of a NeXO term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub category: String,
    pub value: Option<f64>,
}

/// Content of the detail panel for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDetails {
    pub id: NodeId,
    pub kind: PanelKind,
    pub title: String,
    pub link: Option<String>,
    pub summary: Vec<DetailRow>,
    pub sections: Vec<DetailSection>,
    pub genes: Vec<String>,
    pub scores: Vec<Score>,
    pub gene_table: GeneTable,
    /// Whether the interaction subnetwork belongs next to this panel.
    pub shows_subnetwork: bool,
}

impl NodeDetails {
    /// Build the panel for a record.
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        match record {
            Record::Term(term) if term.is_go_term() => Self::go_term(term),
            Record::Term(term) => Self::nexo_term(term),
            Record::Gene(gene) => Self::gene(gene),
        }
    }

    fn nexo_term(term: &OntologyTermRecord) -> Self {
        let id = NodeId::new(&term.name);
        let title = term
            .cc_annotation
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(&term.name)
            .to_string();

        let number = |value: Option<f64>| {
            DetailValue::Text(value.map_or_else(|| EMPTY_RECORD.to_string(), |v| v.to_string()))
        };
        let aligned = term
            .best_alignment_ontology
            .as_deref()
            .filter(|code| !code.is_empty() && *code != "None")
            .and_then(category_name)
            .unwrap_or("-");

        let mut summary = vec![
            DetailRow::new("Robustness", number(term.robustness)),
            DetailRow::new("Interaction Density", number(term.interaction_density)),
            DetailRow::new("Bootstrap", number(term.bootstrap)),
            DetailRow::new("Best Aligned GO", DetailValue::Text(aligned.to_string())),
        ];
        if let Some(go_id) = term
            .best_alignment_go_term
            .as_deref()
            .filter(|id| !id.trim().is_empty())
        {
            summary.push(DetailRow::new(
                "Best Aligned GO Term",
                DetailValue::Link {
                    text: go_id.to_string(),
                    href: format!("{QUICK_GO_API}{go_id}"),
                },
            ));
        }

        let section = |title: &str, name: Option<&String>, definition: Option<&String>| DetailSection {
            title: title.to_string(),
            rows: vec![
                DetailRow::new("Name", DetailValue::text_or_empty(name.map(String::as_str))),
                DetailRow::new(
                    "Definition",
                    DetailValue::text_or_empty(definition.map(String::as_str)),
                ),
            ],
        };
        let sections = vec![
            section(
                "Biological Process",
                term.bp_annotation.as_ref(),
                term.bp_definition.as_ref(),
            ),
            section(
                "Cellular Component",
                term.cc_annotation.as_ref(),
                term.cc_definition.as_ref(),
            ),
            section(
                "Molecular Function",
                term.mf_annotation.as_ref(),
                term.mf_definition.as_ref(),
            ),
        ];

        let scores = CATEGORY_MAP
            .iter()
            .zip([term.bp_score, term.cc_score, term.mf_score])
            .map(|((_, category), value)| Score {
                category: (*category).to_string(),
                value,
            })
            .collect();

        Self {
            id,
            kind: PanelKind::NexoTerm,
            title,
            link: None,
            summary,
            sections,
            genes: term.assigned_genes.clone(),
            scores,
            gene_table: GeneTable::None,
            shows_subnetwork: true,
        }
    }

    fn go_term(term: &OntologyTermRecord) -> Self {
        let mut seen = BTreeSet::new();
        let names: Vec<String> = term
            .assigned_gene_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();
        let gene_table = if names.is_empty() {
            GeneTable::None
        } else {
            GeneTable::Pending { names }
        };

        Self {
            id: NodeId::new(&term.name),
            kind: PanelKind::GoTerm,
            title: term.term_name.clone().unwrap_or_else(|| term.name.clone()),
            link: Some(format!("{QUICK_GO_API}{}", term.name)),
            summary: vec![
                DetailRow::new("Description", DetailValue::text_or_empty(term.definition.as_deref())),
                DetailRow::new("Synonym", DetailValue::text_or_empty(term.synonym.as_deref())),
                DetailRow::new("Comment", DetailValue::text_or_empty(term.comment.as_deref())),
            ],
            sections: Vec::new(),
            genes: Vec::new(),
            scores: Vec::new(),
            gene_table,
            shows_subnetwork: false,
        }
    }

    fn gene(gene: &GeneRecord) -> Self {
        let description = match gene.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => DetailValue::List(
                text.split(';')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => DetailValue::Text(EMPTY_RECORD.to_string()),
        };

        Self {
            id: NodeId::new(&gene.name),
            kind: PanelKind::Gene,
            title: gene.name.clone(),
            link: None,
            summary: vec![
                DetailRow::new(
                    "Gene ID",
                    DetailValue::Link {
                        text: gene.name.clone(),
                        href: format!("{SGD_API}{}", gene.name),
                    },
                ),
                DetailRow::new("Gene Name", DetailValue::text_or_empty(gene.symbol.as_deref())),
                DetailRow::new("ORF Name", DetailValue::text_or_empty(gene.orf.as_deref())),
                DetailRow::new("Description", description),
            ],
            sections: Vec::new(),
            genes: Vec::new(),
            scores: Vec::new(),
            gene_table: GeneTable::None,
            shows_subnetwork: true,
        }
    }

    /// Gene names still waiting for a names lookup.
    #[must_use]
    pub fn pending_names(&self) -> Option<&[String]> {
        match &self.gene_table {
            GeneTable::Pending { names } => Some(names),
            _ => None,
        }
    }

    /// Fill the gene table from a names lookup, sorted by symbol.
    pub fn apply_names(&mut self, records: &[Record]) {
        let mut rows: Vec<GeneRow> = records
            .iter()
            .filter_map(|record| match record {
                Record::Gene(gene) => Some(GeneRow {
                    sgd_id: gene.name.clone(),
                    symbol: gene.symbol.clone().unwrap_or_else(|| gene.name.clone()),
                    orf: gene.orf.clone().unwrap_or_else(|| EMPTY_RECORD.to_string()),
                    link: format!("{SGD_API}{}", gene.name),
                }),
                Record::Term(_) => None,
            })
            .collect();
        rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        self.gene_table = GeneTable::Loaded { rows };
    }

    /// Record a failed names lookup.
    pub fn fail_names(&mut self, message: impl Into<String>) {
        self.gene_table = GeneTable::Failed {
            message: message.into(),
        };
    }
}

// =============================================================================
// PANEL STATE
// =============================================================================

/// Content of the detail panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailContent {
    #[default]
    Empty,
    Loading { node: NodeId },
    Ready { details: Box<NodeDetails> },
    Failed { node: NodeId, message: String },
}

/// The detail panel: visibility plus content.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailPanel {
    pub visible: bool,
    pub content: DetailContent,
}

impl DetailPanel {
    /// Details currently shown, if loaded.
    #[must_use]
    pub fn details(&self) -> Option<&NodeDetails> {
        match &self.content {
            DetailContent::Ready { details } => Some(details),
            _ => None,
        }
    }

    pub fn details_mut(&mut self) -> Option<&mut NodeDetails> {
        match &mut self.content {
            DetailContent::Ready { details } => Some(details),
            _ => None,
        }
    }

    /// Node the panel is about, whatever its state.
    #[must_use]
    pub fn node(&self) -> Option<&NodeId> {
        match &self.content {
            DetailContent::Empty => None,
            DetailContent::Loading { node } | DetailContent::Failed { node, .. } => Some(node),
            DetailContent::Ready { details } => Some(&details.id),
        }
    }
}

// =============================================================================
// SUBNETWORK
// =============================================================================

/// Interaction subnetwork shown next to a NeXO term.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subnetwork {
    pub term: NodeId,
    pub nodes: usize,
    pub edges: usize,
    pub elements: Value,
}

impl Subnetwork {
    #[must_use]
    pub fn from_response(term: NodeId, response: InteractionsResponse) -> Self {
        let (nodes, edges) = response.counts();
        Self {
            term,
            nodes,
            edges,
            elements: response.graph.elements,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
