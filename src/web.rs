use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::chart::ChartModel;
use crate::physics::{BoxParams, DEFAULT_LENGTH, MIN_LEVEL};
use crate::state::{InputEvent, StateSnapshot, Visualizer};
use crate::{Config, Result};

/// Shared server state: the one visualizer behind the page.
#[derive(Clone)]
pub struct AppState {
    visualizer: Arc<Mutex<Visualizer>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            visualizer: Arc::new(Mutex::new(Visualizer::new(&config.initial))),
        }
    }
}

#[derive(Deserialize)]
struct SeriesQuery {
    n: Option<u32>,
    length: Option<f64>,
    normalized: Option<bool>,
}

#[derive(Serialize)]
struct StateResponse {
    state: StateSnapshot,
    chart: Arc<ChartModel>,
}

const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Particle in a Box</title>
    <link rel="preconnect" href="https://fonts.googleapis.com" />
    <link rel="preconnect" href="https://fonts.gstatic.com" crossorigin />
    <link href="https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&display=swap" rel="stylesheet" />
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js"></script>
    <style>
      html, body { margin: 0; padding: 0; min-height: 100%; background: #0b0c10; color: #e6e6e6; font-family: "Space Grotesk", "Segoe UI", sans-serif; }
      .page { max-width: 1040px; margin: 0 auto; padding: 24px; }
      .brand { font-size: 24px; font-weight: 600; text-align: center; letter-spacing: 0.02em; }
      .lead { text-align: center; color: #9aa3ad; font-size: 14px; margin: 8px 0 20px; }
      #panel { display: grid; grid-template-columns: repeat(3, minmax(0, 1fr)); gap: 16px; background: rgba(10,12,16,0.9); padding: 14px; border: 1px solid #2a2f36; border-radius: 10px; }
      .control { display: flex; flex-direction: column; align-items: center; gap: 6px; }
      .control label { font-size: 14px; color: #c9d1d9; }
      .hint { font-size: 11px; color: #7f8895; }
      input { background: #0f141b; color: #e6e6e6; border: 1px solid #2a2f36; border-radius: 6px; padding: 4px 6px; font-size: 13px; }
      input[type="number"] { width: 120px; text-align: center; }
      input[type="range"] { width: 200px; }
      #chartBox { position: relative; height: 55vh; margin-top: 16px; border: 1px solid #1f2630; border-radius: 10px; background: #0f1218; padding: 8px; }
      #captions { margin-top: 14px; text-align: center; font-size: 12px; color: #7f8895; }
      #captions p { margin: 4px 0; }
      @media (max-width: 720px) { #panel { grid-template-columns: 1fr; } }
    </style>
  </head>
  <body>
    <div class="page">
      <div class="brand">Wave Pattern Visualizer for Quantum Particles</div>
      <div class="lead">Wave pattern (&Psi;) and probability distribution (|&Psi;|&sup2;) for a particle trapped in a one-dimensional box.</div>

      <div id="panel">
        <div class="control">
          <label for="level">Quantum Number (n): <span id="levelVal">1</span></label>
          <input id="level" type="range" min="1" max="10" step="1" value="1" />
          <span class="hint">(1 to 10)</span>
        </div>
        <div class="control">
          <label for="length">Box Length (L)</label>
          <input id="length" type="number" min="0.1" max="10" step="0.1" value="1" />
          <span class="hint">(e.g., 0.1 to 10)</span>
        </div>
        <div class="control">
          <label><input id="normalize" type="checkbox" /> Normalize</label>
          <span class="hint">(Apply &radic;2/L factor)</span>
        </div>
      </div>

      <div id="chartBox"><canvas id="chart"></canvas></div>
      <div id="captions"></div>
    </div>
    <script>
      const levelInput = document.getElementById("level");
      const levelVal = document.getElementById("levelVal");
      const lengthInput = document.getElementById("length");
      const normalizeInput = document.getElementById("normalize");
      const captionsEl = document.getElementById("captions");
      let chart = null;

      function buildOptions(model) {
        const o = model.options;
        const b = o.bounds;
        const count = model.data.labels.length - 1;
        return {
          responsive: true,
          maintainAspectRatio: false,
          animation: { duration: 0 },
          interaction: { mode: "index", intersect: false },
          plugins: {
            legend: { position: "top", labels: { color: "#c9d1d9" } },
            title: { display: true, text: o.title, color: "#e6e6e6", font: { size: 16 } },
            tooltip: {
              callbacks: {
                title(items) {
                  if (!items.length) return "";
                  const x = (items[0].dataIndex * b.x.max) / count;
                  return "x = " + x.toFixed(o.tooltip_precision);
                },
                label(ctx) {
                  let label = (ctx.dataset.label || "").split(" (")[0];
                  if (label) label += ": ";
                  if (ctx.parsed.y !== null) label += ctx.parsed.y.toFixed(o.tooltip_precision);
                  return label;
                },
              },
            },
          },
          scales: {
            x: {
              type: "linear",
              title: { display: true, text: o.axis_titles.x, color: "#9aa3ad" },
              min: b.x.min,
              max: b.x.max,
              ticks: {
                stepSize: b.x_step,
                color: "#9aa3ad",
                callback: (v) => Number(v).toFixed(o.tick_precision),
              },
              grid: { color: "#1f2630" },
            },
            yPsi: {
              type: "linear",
              position: "left",
              min: b.wave.min,
              max: b.wave.max,
              title: { display: true, text: o.axis_titles.wave, color: "#9aa3ad" },
              ticks: { color: "#9aa3ad" },
              grid: { drawOnChartArea: false },
            },
            yProb: {
              type: "linear",
              position: "right",
              min: b.density.min,
              max: b.density.max,
              title: { display: true, text: o.axis_titles.density, color: "#9aa3ad" },
              ticks: { color: "#9aa3ad" },
              grid: { drawOnChartArea: true, color: "#1f2630" },
            },
          },
        };
      }

      function buildData(model) {
        const grid = model.series.grid;
        return {
          labels: model.data.labels,
          datasets: model.data.datasets.map((ds) => ({
            ...ds,
            data: ds.data.map((y, i) => ({ x: grid[i], y })),
          })),
        };
      }

      function render(payload, syncLength) {
        const { state, chart: model } = payload;
        levelInput.value = state.level;
        levelVal.textContent = state.level;
        normalizeInput.checked = state.normalized;
        if (syncLength) lengthInput.value = state.length_text;

        const data = buildData(model);
        const options = buildOptions(model);
        if (chart) {
          chart.data = data;
          chart.options = options;
          chart.update("none");
        } else {
          chart = new Chart(document.getElementById("chart"), { type: "line", data, options });
        }

        captionsEl.innerHTML = "";
        for (const text of model.captions) {
          const p = document.createElement("p");
          p.textContent = text;
          captionsEl.appendChild(p);
        }
      }

      // requests go out one at a time, in input order
      let queue = Promise.resolve();
      let shownRevision = -1;

      function show(payload, syncLength) {
        if (payload.state.revision < shownRevision) return;
        shownRevision = payload.state.revision;
        render(payload, syncLength);
      }

      function enqueue(request, syncLength) {
        queue = queue
          .then(request)
          .then(async (res) => {
            if (res.ok) show(await res.json(), syncLength);
          })
          .catch((err) => console.error(err));
      }

      function send(kind, value, syncLength = false) {
        enqueue(
          () =>
            fetch("/api/events", {
              method: "POST",
              headers: { "Content-Type": "application/json" },
              body: JSON.stringify({ kind, value }),
            }),
          syncLength
        );
      }

      levelInput.addEventListener("input", () => send("level", parseInt(levelInput.value, 10)));
      lengthInput.addEventListener("input", () => send("length_change", lengthInput.value));
      lengthInput.addEventListener("blur", () => send("length_commit", lengthInput.value, true));
      normalizeInput.addEventListener("change", () => send("normalize", normalizeInput.checked));

      enqueue(() => fetch("/api/state"), true);
    </script>
  </body>
</html>
"##;

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn health() -> impl IntoResponse {
    "particle-box is running"
}

async fn current_state(State(state): State<AppState>) -> Json<StateResponse> {
    let mut visualizer = state.visualizer.lock().await;
    Json(StateResponse {
        state: visualizer.snapshot(),
        chart: visualizer.chart(),
    })
}

async fn apply_event(
    State(state): State<AppState>,
    Json(event): Json<InputEvent>,
) -> Json<StateResponse> {
    let mut visualizer = state.visualizer.lock().await;
    visualizer.apply(event);
    Json(StateResponse {
        state: visualizer.snapshot(),
        chart: visualizer.chart(),
    })
}

async fn series(Query(q): Query<SeriesQuery>) -> Result<Json<ChartModel>> {
    let params = BoxParams::new(
        q.n.unwrap_or(MIN_LEVEL),
        q.length.unwrap_or(DEFAULT_LENGTH),
        q.normalized.unwrap_or(false),
    )
    .inspect_err(|e| tracing::warn!("rejected series request: {e}"))?;
    Ok(Json(ChartModel::build(params)))
}

/// Build the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/state", get(current_state))
        .route("/api/events", post(apply_event))
        .route("/api/series", get(series))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(config: Config) -> Result<()> {
    let router = create_router(AppState::new(&config));

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Serving on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn app() -> AppState {
        AppState::new(&Config::default())
    }

    #[tokio::test]
    async fn test_initial_state() {
        let Json(res) = current_state(State(app())).await;
        assert_eq!(res.state.level, 1);
        assert_eq!(res.state.length, 1.0);
        assert!(!res.state.normalized);
        assert_eq!(res.chart.series.len(), 201);
    }

    #[tokio::test]
    async fn test_events_update_shared_state() {
        let state = app();
        apply_event(State(state.clone()), Json(InputEvent::Level(2))).await;
        let Json(res) = apply_event(
            State(state.clone()),
            Json(InputEvent::LengthChange("2".into())),
        )
        .await;
        assert_eq!(res.state.level, 2);
        assert_eq!(res.chart.options.bounds.x.max, 2.0);

        let Json(res) = current_state(State(state)).await;
        assert_eq!(res.chart.params, BoxParams::new(2, 2.0, false).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_commit_over_http_resets() {
        let state = app();
        apply_event(State(state.clone()), Json(InputEvent::LengthChange("5".into()))).await;
        let Json(res) = apply_event(
            State(state.clone()),
            Json(InputEvent::LengthCommit("abc".into())),
        )
        .await;
        assert_eq!(res.state.length, 1.0);
        assert_eq!(res.state.length_text, "1");
    }

    #[tokio::test]
    async fn test_repeated_reads_share_cached_chart() {
        let state = app();
        let Json(a) = current_state(State(state.clone())).await;
        let Json(b) = current_state(State(state.clone())).await;
        assert!(Arc::ptr_eq(&a.chart, &b.chart));
        assert_eq!(state.visualizer.lock().await.recompute_count(), 1);
    }

    #[tokio::test]
    async fn test_series_query() {
        let query = SeriesQuery {
            n: Some(1),
            length: Some(2.0),
            normalized: Some(true),
        };
        let Json(model) = series(Query(query)).await.unwrap();
        assert!((model.series.wave[100] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_series_query_rejects_bad_length() {
        let query = SeriesQuery {
            n: None,
            length: Some(-1.0),
            normalized: None,
        };
        let err = series(Query(query)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidLength(_)));

        let query = SeriesQuery {
            n: Some(0),
            length: None,
            normalized: None,
        };
        let err = series(Query(query)).await.unwrap_err();
        assert_eq!(err, Error::InvalidLevel(0));
    }

    #[tokio::test]
    async fn test_responses_carry_increasing_revision() {
        let state = app();
        let Json(initial) = current_state(State(state.clone())).await;
        let mut seen = initial.state.revision;
        for n in [2, 3, 2] {
            let Json(res) = apply_event(State(state.clone()), Json(InputEvent::Level(n))).await;
            assert!(res.state.revision > seen);
            seen = res.state.revision;
            assert_eq!(res.chart.params.level, n as u32);
        }

        let body = serde_json::to_value(&current_state(State(state)).await.0).unwrap();
        assert_eq!(body["state"]["revision"], 3);
    }

    #[tokio::test]
    async fn test_series_query_rejects_subnormal_length() {
        let query = SeriesQuery {
            n: Some(1),
            length: Some(1e-310),
            normalized: Some(true),
        };
        let err = series(Query(query)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidLength(_)));
    }

    #[test]
    fn test_page_serializes_requests() {
        assert!(INDEX_HTML.contains("queue = queue"));
        assert!(INDEX_HTML.contains("payload.state.revision < shownRevision"));
        assert!(INDEX_HTML.contains(r#"enqueue(() => fetch("/api/state"), true)"#));
    }

    #[test]
    fn test_router_builds() {
        let _router = create_router(app());
    }
}
