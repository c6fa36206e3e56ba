//! Plot bounds derived from the current state so the curves always fit.

use serde::Serialize;

use crate::physics::{amplitude_factor, BoxParams};

/// Headroom above the theoretical peak so the curve never touches the border
pub const AXIS_MARGIN: f64 = 1.1;

/// Number of x-axis ticks between 0 and L
pub const X_TICK_DIVISIONS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotBounds {
    pub x: AxisBounds,
    pub x_step: f64,
    pub wave: AxisBounds,
    pub density: AxisBounds,
}

impl PlotBounds {
    pub fn for_params(params: BoxParams) -> Self {
        let length = params.effective_length();
        // |Ψ| peaks at the amplitude factor, |Ψ|² at its square
        let peak = amplitude_factor(length, params.normalized);
        let max_wave = AXIS_MARGIN * peak;
        let max_density = AXIS_MARGIN * peak * peak;

        PlotBounds {
            x: AxisBounds {
                min: 0.0,
                max: length,
            },
            x_step: length / X_TICK_DIVISIONS,
            wave: AxisBounds {
                min: -max_wave,
                max: max_wave,
            },
            density: AxisBounds {
                min: 0.0,
                max: max_density,
            },
        }
    }
}
