//! Query endpoints: one JSON answer, or the same run streamed as SSE.

use super::{ApiError, AppState, QueryRequest};
use crate::pipeline::{PipelineResult, ProgressEvent};
use axum::{
    extract::State,
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// POST /v1/query - Run the pipeline and return the result.
///
/// Pipeline failures are still a 200: the body carries `success = false`.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<PipelineResult>, ApiError> {
    let question = request.validated_question()?;

    let result = state
        .coordinator
        .run(question, |event| {
            debug!(step = %event.step, message = %event.message, "Progress");
        })
        .await;

    Ok(Json(result))
}

enum StreamItem {
    Progress(ProgressEvent),
    Result(Box<PipelineResult>),
}

/// POST /v1/query/stream - Stream `progress` events, then one `result` event.
pub async fn handle_stream(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Response, ApiError> {
    let question = request.validated_question()?.to_string();
    let (tx, rx) = mpsc::unbounded_channel();

    let coordinator = Arc::clone(&state.coordinator);
    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let result = coordinator
            .run(&question, move |event| {
                // A closed channel means the client went away; the run still finishes.
                let _ = progress_tx.send(StreamItem::Progress(event));
            })
            .await;
        let _ = tx.send(StreamItem::Result(Box::new(result)));
    });

    Ok(Sse::new(create_sse_stream(rx)).into_response())
}

fn create_sse_stream(
    mut rx: mpsc::UnboundedReceiver<StreamItem>,
) -> impl futures::Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        while let Some(item) = rx.recv().await {
            let (name, data) = match &item {
                StreamItem::Progress(event) => ("progress", serde_json::to_string(event)),
                StreamItem::Result(result) => ("result", serde_json::to_string(result)),
            };

            match data {
                Ok(data) => yield Ok(Event::default().event(name).data(data)),
                Err(e) => warn!(error = %e, event = name, "Failed to serialize SSE event"),
            }

            if matches!(item, StreamItem::Result(_)) {
                break;
            }
        }
    }
}
