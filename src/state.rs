use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chart::ChartModel;
use crate::config::InitialState;
use crate::input::{clamp_level, on_length_change, on_length_commit, LengthUpdate};
use crate::physics::{is_valid_length, BoxParams, DEFAULT_LENGTH};

/// One change on one of the three controls.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputEvent {
    Level(i64),
    LengthChange(String),
    LengthCommit(String),
    Normalize(bool),
}

/// Serializable view of the controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Number of events applied so far; responses carrying a lower value
    /// than one already shown are stale.
    pub revision: u64,
    pub level: u32,
    pub length: f64,
    pub normalized: bool,
    pub length_text: String,
}

/// Owner of the user-controlled state and the last derived chart.
pub struct Visualizer {
    params: BoxParams,
    length_text: String,
    cached: Option<(BoxParams, Arc<ChartModel>)>,
    recompute_count: u64,
    revision: u64,
}

impl Visualizer {
    pub fn new(initial: &InitialState) -> Self {
        let length = if is_valid_length(initial.length) {
            initial.length
        } else {
            DEFAULT_LENGTH
        };
        let params = BoxParams {
            level: clamp_level(initial.level as i64),
            length,
            normalized: initial.normalized,
        };

        Visualizer {
            length_text: params.length.to_string(),
            params,
            cached: None,
            recompute_count: 0,
            revision: 0,
        }
    }

    pub fn params(&self) -> BoxParams {
        self.params
    }

    pub fn set_level(&mut self, raw: i64) {
        self.params.level = clamp_level(raw);
    }

    /// Keystroke in the length field. Invalid text is kept in the field but
    /// never reaches the sampler.
    pub fn change_length(&mut self, raw: &str) {
        self.length_text = raw.to_string();
        if let LengthUpdate::Apply(length) = on_length_change(raw) {
            self.params.length = length;
        }
    }

    /// Focus left the length field.
    pub fn commit_length(&mut self, raw: &str) {
        match on_length_commit(raw) {
            LengthUpdate::Reset(length) => {
                tracing::debug!(input = raw, "length input rejected, resetting to {length}");
                self.params.length = length;
                self.length_text = length.to_string();
            }
            // keystrokes already applied any valid value
            LengthUpdate::Apply(_) | LengthUpdate::Retain => {
                self.length_text = raw.to_string();
            }
        }
    }

    pub fn set_normalized(&mut self, normalized: bool) {
        self.params.normalized = normalized;
    }

    pub fn apply(&mut self, event: InputEvent) {
        self.revision += 1;
        match event {
            InputEvent::Level(n) => self.set_level(n),
            InputEvent::LengthChange(raw) => self.change_length(&raw),
            InputEvent::LengthCommit(raw) => self.commit_length(&raw),
            InputEvent::Normalize(on) => self.set_normalized(on),
        }
    }

    /// Chart for the current state, rebuilt only when the state changed
    /// since the last call.
    pub fn chart(&mut self) -> Arc<ChartModel> {
        if let Some((key, model)) = &self.cached {
            if *key == self.params {
                return Arc::clone(model);
            }
        }

        let model = Arc::new(ChartModel::build(self.params));
        self.recompute_count += 1;
        tracing::debug!(
            level = self.params.level,
            length = self.params.length,
            normalized = self.params.normalized,
            "recomputed series"
        );
        self.cached = Some((self.params, Arc::clone(&model)));
        model
    }

    pub fn recompute_count(&self) -> u64 {
        self.recompute_count
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            revision: self.revision,
            level: self.params.level,
            length: self.params.length,
            normalized: self.params.normalized,
            length_text: self.length_text.clone(),
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer::new(&InitialState::default())
    }
}
