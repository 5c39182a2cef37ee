use serde::{Deserialize, Serialize};

/// One row of the ranked drug table produced by the prediction model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugPrediction {
    pub drug_id: String,
    pub drug_name: String,
    pub tp_score: f64,
    pub disease_id: String,
    pub disease_name: String,
}

impl DrugPrediction {
    pub fn new(
        drug_id: impl Into<String>,
        drug_name: impl Into<String>,
        tp_score: f64,
        disease_id: impl Into<String>,
        disease_name: impl Into<String>,
    ) -> Self {
        Self {
            drug_id: drug_id.into(),
            drug_name: drug_name.into(),
            tp_score,
            disease_id: disease_id.into(),
            disease_name: disease_name.into(),
        }
    }
}

/// Delimited `node, predicate, node, ...` string plus the model's path score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPath {
    pub path: String,
    pub score: f64,
}

impl ScoredPath {
    pub fn new(path: impl Into<String>, score: f64) -> Self {
        Self {
            path: path.into(),
            score,
        }
    }
}

/// Explanatory path variants for one drug/disease pair, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPaths {
    pub drug_id: String,
    pub disease_id: String,
    #[serde(default)]
    pub paths: Vec<ScoredPath>,
}

impl PairPaths {
    pub fn new(
        drug_id: impl Into<String>,
        disease_id: impl Into<String>,
        paths: Vec<ScoredPath>,
    ) -> Self {
        Self {
            drug_id: drug_id.into(),
            disease_id: disease_id.into(),
            paths,
        }
    }
}

/// Score of the first table row for `drug_id`.
pub fn treat_score(top_drugs: &[DrugPrediction], drug_id: &str) -> Option<f64> {
    top_drugs
        .iter()
        .find(|row| row.drug_id == drug_id)
        .map(|row| row.tp_score)
}
