//! # Record Schemas
//!
//! Typed records for the two entity kinds the data service returns:
//! ontology terms (NeXO and GO) and genes.
//!
//! The service sends untyped JSON objects with human-readable keys
//! (`"BP Annotation"`, `"Assigned Orfs"`, ...). Values are loosely typed:
//! scores may arrive as numbers or numeric strings, and gene lists as a
//! list or a single string. The deserializers below absorb that looseness
//! so the rest of the engine works with a closed set of optional fields.

use crate::NodeId;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// LENIENT FIELD DESERIALIZERS
// =============================================================================

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn push_text(fields: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<&String>) {
    if let Some(value) = value {
        fields.push((name, value.clone()));
    }
}

fn push_number(fields: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<f64>) {
    if let Some(value) = value {
        fields.push((name, value.to_string()));
    }
}

fn push_list(fields: &mut Vec<(&'static str, String)>, name: &'static str, values: &[String]) {
    if !values.is_empty() {
        fields.push((name, values.join(",")));
    }
}

// =============================================================================
// ONTOLOGY TERM
// =============================================================================

/// A NeXO or GO ontology term.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyTermRecord {
    /// Term id (`"12345"` for NeXO, `"GO:0005737"` for GO).
    #[serde(alias = "id")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,

    // GO fields
    #[serde(default, rename = "term name", deserialize_with = "lenient_string")]
    pub term_name: Option<String>,
    #[serde(default, rename = "def", deserialize_with = "lenient_string")]
    pub definition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub synonym: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: Option<String>,

    // NeXO alignment fields
    #[serde(default, rename = "BP Annotation", deserialize_with = "lenient_string")]
    pub bp_annotation: Option<String>,
    #[serde(default, rename = "BP Definition", deserialize_with = "lenient_string")]
    pub bp_definition: Option<String>,
    #[serde(default, rename = "CC Annotation", deserialize_with = "lenient_string")]
    pub cc_annotation: Option<String>,
    #[serde(default, rename = "CC Definition", deserialize_with = "lenient_string")]
    pub cc_definition: Option<String>,
    #[serde(default, rename = "MF Annotation", deserialize_with = "lenient_string")]
    pub mf_annotation: Option<String>,
    #[serde(default, rename = "MF Definition", deserialize_with = "lenient_string")]
    pub mf_definition: Option<String>,
    #[serde(default, rename = "Best Alignment Ontology", deserialize_with = "lenient_string")]
    pub best_alignment_ontology: Option<String>,
    #[serde(default, rename = "Best Alignment GO Term ID", deserialize_with = "lenient_string")]
    pub best_alignment_go_term: Option<String>,
    #[serde(default, rename = "Robustness", deserialize_with = "lenient_number")]
    pub robustness: Option<f64>,
    #[serde(default, rename = "Interaction Density", deserialize_with = "lenient_number")]
    pub interaction_density: Option<f64>,
    #[serde(default, rename = "Bootstrap", deserialize_with = "lenient_number")]
    pub bootstrap: Option<f64>,
    #[serde(default, rename = "BP Score", deserialize_with = "lenient_number")]
    pub bp_score: Option<f64>,
    #[serde(default, rename = "CC Score", deserialize_with = "lenient_number")]
    pub cc_score: Option<f64>,
    #[serde(default, rename = "MF Score", deserialize_with = "lenient_number")]
    pub mf_score: Option<f64>,

    // Gene assignments
    #[serde(default, rename = "Assigned Genes", deserialize_with = "string_or_list")]
    pub assigned_genes: Vec<String>,
    #[serde(default, rename = "Assigned Gene Ids", deserialize_with = "string_or_list")]
    pub assigned_gene_ids: Vec<String>,
}

impl OntologyTermRecord {
    /// Whether this is a GO term rather than a NeXO term.
    #[must_use]
    pub fn is_go_term(&self) -> bool {
        self.name.contains("GO")
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("name", self.name.clone())];
        push_text(&mut fields, "label", self.label.as_ref());
        push_text(&mut fields, "term name", self.term_name.as_ref());
        push_text(&mut fields, "def", self.definition.as_ref());
        push_text(&mut fields, "synonym", self.synonym.as_ref());
        push_text(&mut fields, "comment", self.comment.as_ref());
        push_text(&mut fields, "BP Annotation", self.bp_annotation.as_ref());
        push_text(&mut fields, "BP Definition", self.bp_definition.as_ref());
        push_text(&mut fields, "CC Annotation", self.cc_annotation.as_ref());
        push_text(&mut fields, "CC Definition", self.cc_definition.as_ref());
        push_text(&mut fields, "MF Annotation", self.mf_annotation.as_ref());
        push_text(&mut fields, "MF Definition", self.mf_definition.as_ref());
        push_text(&mut fields, "Best Alignment Ontology", self.best_alignment_ontology.as_ref());
        push_text(&mut fields, "Best Alignment GO Term ID", self.best_alignment_go_term.as_ref());
        push_number(&mut fields, "Robustness", self.robustness);
        push_number(&mut fields, "Interaction Density", self.interaction_density);
        push_number(&mut fields, "Bootstrap", self.bootstrap);
        push_number(&mut fields, "BP Score", self.bp_score);
        push_number(&mut fields, "CC Score", self.cc_score);
        push_number(&mut fields, "MF Score", self.mf_score);
        push_list(&mut fields, "Assigned Genes", &self.assigned_genes);
        push_list(&mut fields, "Assigned Gene Ids", &self.assigned_gene_ids);
        fields
    }
}

// =============================================================================
// GENE
// =============================================================================

/// A yeast gene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    /// SGD id.
    #[serde(alias = "id")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub label: Option<String>,
    /// Gene symbol.
    #[serde(default, rename = "Assigned Genes", deserialize_with = "lenient_string")]
    pub symbol: Option<String>,
    /// Systematic ORF name.
    #[serde(default, rename = "Assigned Orfs", deserialize_with = "lenient_string")]
    pub orf: Option<String>,
    #[serde(default, rename = "SGD Gene Description", deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

impl GeneRecord {
    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("name", self.name.clone())];
        push_text(&mut fields, "label", self.label.as_ref());
        push_text(&mut fields, "Assigned Genes", self.symbol.as_ref());
        push_text(&mut fields, "Assigned Orfs", self.orf.as_ref());
        push_text(&mut fields, "SGD Gene Description", self.description.as_ref());
        fields
    }
}

// =============================================================================
// RECORD
// =============================================================================

/// A record returned by search, detail and name lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    /// NeXO or GO term.
    Term(OntologyTermRecord),
    /// Gene.
    Gene(GeneRecord),
}

impl Record {
    /// Classify an untyped payload by its id.
    ///
    /// Ids containing `GO` are GO terms, ids containing `S` are SGD genes,
    /// everything else is a NeXO term.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let id = value
            .get("name")
            .or_else(|| value.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| serde_json::Error::missing_field("name"))?;

        if !id.contains("GO") && id.contains('S') {
            Ok(Self::Gene(serde_json::from_value(value)?))
        } else {
            Ok(Self::Term(serde_json::from_value(value)?))
        }
    }

    /// The record id as a node id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Term(term) => NodeId::new(&term.name),
            Self::Gene(gene) => NodeId::new(&gene.name),
        }
    }

    /// Short label shown next to the id in result rows.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Term(term) => term.label.as_deref().or(term.term_name.as_deref()),
            Self::Gene(gene) => gene.label.as_deref().or(gene.symbol.as_deref()),
        }
    }

    /// Searchable fields as `(field name, text)` in declaration order.
    ///
    /// Absent optional fields are omitted; list fields are comma-joined.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Term(term) => term.fields(),
            Self::Gene(gene) => gene.fields(),
        }
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nexo_term_with_loose_values() {
        let record: Record = serde_json::from_value(json!({
            "name": "10234",
            "Robustness": "0.82",
            "Bootstrap": 97,
            "Assigned Genes": "ACT1",
            "CC Annotation": "actin cortical patch"
        }))
        .expect("deserialize");

        let Record::Term(term) = record else {
            unreachable!("numeric ids are terms");
        };
        assert_eq!(term.robustness, Some(0.82));
        assert_eq!(term.bootstrap, Some(97.0));
        assert_eq!(term.assigned_genes, vec!["ACT1".to_string()]);
        assert!(!term.is_go_term());
    }

    #[test]
    fn sgd_ids_are_genes() {
        let record: Record = serde_json::from_value(json!({
            "name": "S000001855",
            "Assigned Genes": "ACT1",
            "Assigned Orfs": "YFL039C"
        }))
        .expect("deserialize");

        assert!(matches!(record, Record::Gene(_)));
        assert_eq!(record.label(), Some("ACT1"));
    }

    #[test]
    fn go_ids_are_terms_even_with_s() {
        let record = Record::from_value(json!({"name": "GO:0005737", "term name": "cytoplasm"}))
            .expect("classify");
        assert!(matches!(record, Record::Term(ref t) if t.is_go_term()));
    }

    #[test]
    fn missing_id_is_rejected() {
        assert!(Record::from_value(json!({"label": "nameless"})).is_err());
    }

    #[test]
    fn fields_follow_declaration_order() {
        let record = Record::Term(OntologyTermRecord {
            name: "1".into(),
            label: Some("l".into()),
            mf_definition: Some("m".into()),
            bp_annotation: Some("b".into()),
            ..OntologyTermRecord::default()
        });

        let names: Vec<_> = record.fields().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "label", "BP Annotation", "MF Definition"]);
    }
}
