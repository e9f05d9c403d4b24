/// Longest input the gate accepts; anything longer is truncated, not
/// rejected.
pub const MAX_QUERY_LEN: usize = 50;

/// Trimmed inputs at or below this length never trigger a query.
pub const MIN_QUERY_LEN: usize = 3;

/// Outcome of offering an input value to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Conditions met, a query should be issued for the accepted value.
    Query,
    /// Accept the value but stay quiet.
    Hold,
}

/// Cut an input down to [`MAX_QUERY_LEN`] characters.
pub fn truncate_input(candidate: &str) -> &str {
    match candidate.char_indices().nth(MAX_QUERY_LEN) {
        Some((idx, _)) => &candidate[..idx],
        None => candidate,
    }
}

fn trimmed_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Decide whether a candidate input should trigger an automatic query.
///
/// `previous` is the last accepted value. A query fires only when the
/// truncated candidate trims to more than [`MIN_QUERY_LEN`] characters,
/// its trimmed length differs from the previous one, and nothing is in
/// flight.
pub fn evaluate(previous: &str, candidate: &str, in_flight: bool) -> GateDecision {
    let candidate = truncate_input(candidate);
    let candidate_len = trimmed_len(candidate);
    let previous_len = trimmed_len(previous);

    let long_enough = candidate_len > MIN_QUERY_LEN;
    let length_changed = candidate_len != previous_len;

    if long_enough && length_changed && !in_flight {
        GateDecision::Query
    } else {
        GateDecision::Hold
    }
}

/// Stateful wrapper around [`evaluate`] tracking the accepted input and
/// whether the gate is armed for a manual re-query.
#[derive(Debug, Clone, Default)]
pub struct SearchGate {
    accepted: String,
    armed: bool,
}

impl SearchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a new input value. The truncated value is always accepted;
    /// the decision says whether a query should go out now.
    pub fn offer(&mut self, candidate: &str, in_flight: bool) -> GateDecision {
        let truncated = truncate_input(candidate);
        let decision = evaluate(&self.accepted, truncated, in_flight);
        self.accepted = truncated.to_string();

        match decision {
            GateDecision::Query => self.armed = true,
            GateDecision::Hold => {
                if !in_flight && self.armed {
                    self.armed = false;
                }
            }
        }
        decision
    }

    /// Whether a manual confirmation (key press) may force a re-query.
    /// In-flight state does not suppress a manual trigger.
    pub fn confirm(&self) -> bool {
        self.armed
    }

    /// Re-arm regardless of the change gate, as a content type switch does.
    pub fn force(&mut self) {
        self.armed = true;
    }

    /// Last accepted (truncated) input, as typed.
    pub fn accepted(&self) -> &str {
        &self.accepted
    }

    /// The query the accepted input stands for.
    pub fn query(&self) -> &str {
        self.accepted.trim()
    }

    /// Whether the accepted input is long enough to ever query.
    pub fn has_queryable_input(&self) -> bool {
        trimmed_len(&self.accepted) > MIN_QUERY_LEN
    }

    pub fn reset(&mut self) {
        self.accepted.clear();
        self.armed = false;
    }
}
