//! Flattening per-template matcher results into one candidate pool.

use crate::candidate::{Candidate, TemplateResult};
use crate::trace::trace_event;
use crate::util::{IconMatchError, IconMatchResult};

/// Unordered collection of candidates from every template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidatePool {
    candidates: Vec<Candidate>,
}

impl CandidatePool {
    /// Returns the number of pooled candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true when no template produced a match.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterates over the pooled candidates.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl IntoIterator for CandidatePool {
    type Item = Candidate;
    type IntoIter = std::vec::IntoIter<Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.into_iter()
    }
}

/// Best score and hit count observed for one template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatePeak {
    /// Template identifier.
    pub template: String,
    /// Highest score over all placements.
    pub max_confidence: f32,
    /// Number of raw matches that passed the matcher threshold.
    pub matches: usize,
}

/// Output of [`aggregate`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregation {
    /// Candidates from every template that matched at least once.
    pub pool: CandidatePool,
    /// Templates without a single match, in template order.
    pub not_found: Vec<String>,
    /// Per-template peaks, in template order.
    pub peaks: Vec<TemplatePeak>,
}

/// Tags every raw match with its template id and pools them.
///
/// `ids` and `results` are paired by position and must have equal length.
/// Templates with an empty match list go to `not_found` and add nothing to
/// the pool.
pub fn aggregate<S>(ids: &[S], results: Vec<TemplateResult>) -> IconMatchResult<Aggregation>
where
    S: AsRef<str>,
{
    if ids.len() != results.len() {
        return Err(IconMatchError::TemplateCountMismatch {
            expected: ids.len(),
            got: results.len(),
        });
    }

    let mut agg = Aggregation::default();
    for (id, result) in ids.iter().zip(results) {
        let id = id.as_ref();
        agg.peaks.push(TemplatePeak {
            template: id.to_owned(),
            max_confidence: result.max_confidence,
            matches: result.matches.len(),
        });
        if result.matches.is_empty() {
            agg.not_found.push(id.to_owned());
            continue;
        }
        agg.pool.candidates.extend(
            result
                .matches
                .into_iter()
                .map(|raw| Candidate::from_raw(raw, id)),
        );
    }

    trace_event!(
        "aggregate.done",
        templates = ids.len(),
        pooled = agg.pool.len(),
        not_found = agg.not_found.len(),
    );
    Ok(agg)
}
