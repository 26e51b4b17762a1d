//! Assessment sessions: one run through every shape template.
//!
//! DESIGN
//! ======
//! A session walks the catalog in order. While a shape is in progress the
//! session buffers the current stroke (pointer down, moves, up) and scores
//! it on release when it has at least two points. `advance` records the score
//! and advances; after the last shape the session is completed and its
//! result can be submitted to the score store.
//!
//! ```text
//! InProgress(i, stroke, score?) --up, >=2 pts--> InProgress(i, stroke, score)
//! InProgress(i, _, score)       --advance-->     InProgress(i + 1, [], none) | Completed
//! InProgress(i, _, _)           --reset-->       InProgress(i, [], none)
//! Completed                     --submit-->      Submitting --ok--> Submitted
//!                                                           --err-> Completed(error)
//! any but Submitting            --start_over-->  InProgress(0, [], none)
//! ```
//!
//! Sessions live in memory in a [`SessionRegistry`]. Submission releases the
//! registry lock while the store write is in flight; the `Submitting` phase
//! rejects a second submit meanwhile.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::geometry::Point;
use crate::scoring::{self, ScoreBreakdown, ScoreError};
use crate::services::scores::{self, ScoresError};
use crate::shapes::{self, CanvasSize, ShapeTemplate};
use crate::state::AppState;

/// Shown when the score store failed to initialize.
pub const UNAVAILABLE_MESSAGE: &str = "Score database is not available. Please try again later.";
/// Shown when a store write fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit score. Please try again.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("current shape has no score yet")]
    NoScore,
    #[error("session is not in progress")]
    NotInProgress,
    #[error("session is not completed")]
    NotCompleted,
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("session result was already submitted")]
    AlreadySubmitted,
    #[error("canvas size must be finite, positive and at most 10000")]
    InvalidCanvas,
    #[error("stroke could not be scored: {0}")]
    Score(#[from] ScoreError),
    #[error("submission failed: {0}")]
    Submit(#[from] ScoresError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    InProgress {
        shape_index: usize,
        stroke: Vec<Point>,
        /// Pointer is down and the stroke is still growing.
        drawing: bool,
        score: Option<ScoreBreakdown>,
    },
    Completed {
        /// User-visible message from the last failed submission.
        error: Option<String>,
    },
    Submitting,
    Submitted,
}

impl SessionPhase {
    fn start() -> Self {
        Self::InProgress { shape_index: 0, stroke: Vec::new(), drawing: false, score: None }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InProgress { .. } => "in_progress",
            Self::Completed { .. } => "completed",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
        }
    }
}

/// Snapshot of what was submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub final_score: u8,
    pub individual_scores: Vec<u8>,
}

// =============================================================================
// SESSION
// =============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub canvas: CanvasSize,
    /// Recorded totals, one per finished shape, in catalog order.
    pub scores: Vec<u8>,
    pub phase: SessionPhase,
}

impl Session {
    #[must_use]
    pub fn new(id: Uuid, canvas: CanvasSize) -> Self {
        Self { id, canvas, scores: Vec::new(), phase: SessionPhase::start() }
    }

    /// Template currently being traced, if in progress.
    #[must_use]
    pub fn current_template(&self) -> Option<&'static ShapeTemplate> {
        match self.phase {
            SessionPhase::InProgress { shape_index, .. } => shapes::catalog().get(shape_index),
            _ => None,
        }
    }

    pub fn resize(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Start a new stroke at `p`, discarding any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInProgress`] once every shape is done.
    pub fn pointer_down(&mut self, p: Point) -> Result<(), SessionError> {
        let SessionPhase::InProgress { stroke, drawing, .. } = &mut self.phase else {
            return Err(SessionError::NotInProgress);
        };
        stroke.clear();
        stroke.push(p);
        *drawing = true;
        Ok(())
    }

    /// Extend the current stroke. Ignored while the pointer is up.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInProgress`] once every shape is done.
    pub fn pointer_move(&mut self, p: Point) -> Result<(), SessionError> {
        let SessionPhase::InProgress { stroke, drawing, .. } = &mut self.phase else {
            return Err(SessionError::NotInProgress);
        };
        if *drawing {
            stroke.push(p);
        }
        Ok(())
    }

    /// Finish the current stroke and score it.
    ///
    /// Returns `None` when the pointer was not down or the stroke is shorter
    /// than two points; the previous score is then left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInProgress`] once every shape is done, or
    /// [`SessionError::Score`] if the stroke holds non-finite coordinates.
    pub fn pointer_up(&mut self) -> Result<Option<ScoreBreakdown>, SessionError> {
        let canvas = self.canvas;
        let SessionPhase::InProgress { shape_index, stroke, drawing, score } = &mut self.phase else {
            return Err(SessionError::NotInProgress);
        };
        if !*drawing {
            return Ok(None);
        }
        *drawing = false;
        if stroke.len() < 2 {
            return Ok(None);
        }

        let Some(template) = shapes::catalog().get(*shape_index) else {
            return Err(SessionError::NotInProgress);
        };
        let ideal = template.ideal_points(canvas);
        let breakdown = scoring::evaluate(stroke, &ideal, template.leniency)?;
        *score = Some(breakdown);
        Ok(Some(breakdown))
    }

    /// Trace a whole stroke in one call: down on the first point, move
    /// through the rest, up.
    ///
    /// # Errors
    ///
    /// See [`Session::pointer_up`].
    pub fn trace(&mut self, points: &[Point]) -> Result<Option<ScoreBreakdown>, SessionError> {
        let Some((first, rest)) = points.split_first() else {
            return match self.phase {
                SessionPhase::InProgress { .. } => Ok(None),
                _ => Err(SessionError::NotInProgress),
            };
        };
        self.pointer_down(*first)?;
        for p in rest {
            self.pointer_move(*p)?;
        }
        self.pointer_up()
    }

    /// Clear the current stroke and its score.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInProgress`] once every shape is done.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let SessionPhase::InProgress { stroke, drawing, score, .. } = &mut self.phase else {
            return Err(SessionError::NotInProgress);
        };
        stroke.clear();
        *drawing = false;
        *score = None;
        Ok(())
    }

    /// Record the current score and move to the next shape, completing the
    /// session after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoScore`] before the shape is scored.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let SessionPhase::InProgress { shape_index, score, .. } = &self.phase else {
            return Err(SessionError::NotInProgress);
        };
        let Some(score) = score else {
            return Err(SessionError::NoScore);
        };

        self.scores.push(score.total);
        let next_index = shape_index + 1;
        self.phase = if next_index < shapes::catalog().len() {
            SessionPhase::InProgress { shape_index: next_index, stroke: Vec::new(), drawing: false, score: None }
        } else {
            SessionPhase::Completed { error: None }
        };
        Ok(())
    }

    /// Discard all progress and return to the first shape.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SubmitInFlight`] while a submission is pending.
    pub fn start_over(&mut self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::Submitting {
            return Err(SessionError::SubmitInFlight);
        }
        self.scores.clear();
        self.phase = SessionPhase::start();
        Ok(())
    }

    /// Mean of the recorded scores, rounded; 0 before any shape is done.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn final_score(&self) -> u8 {
        if self.scores.is_empty() {
            return 0;
        }
        let sum: f64 = self.scores.iter().map(|s| f64::from(*s)).sum();
        (sum / self.scores.len() as f64).round() as u8
    }

    /// Enter `Submitting` and return what should be written.
    ///
    /// # Errors
    ///
    /// Fails unless the session is `Completed`.
    pub fn begin_submit(&mut self) -> Result<Submission, SessionError> {
        match self.phase {
            SessionPhase::Completed { .. } => {}
            SessionPhase::Submitting => return Err(SessionError::SubmitInFlight),
            SessionPhase::Submitted => return Err(SessionError::AlreadySubmitted),
            SessionPhase::InProgress { .. } => return Err(SessionError::NotCompleted),
        }
        self.phase = SessionPhase::Submitting;
        Ok(Submission { final_score: self.final_score(), individual_scores: self.scores.clone() })
    }

    /// Leave `Submitting`: `Submitted` on success, back to `Completed` with
    /// the message on failure. No-op in any other phase.
    pub fn finish_submit(&mut self, outcome: Result<(), String>) {
        if self.phase != SessionPhase::Submitting {
            return;
        }
        self.phase = match outcome {
            Ok(()) => SessionPhase::Submitted,
            Err(message) => SessionPhase::Completed { error: Some(message) },
        };
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        let (shape_index, stroke_points, drawing, score, error) = match &self.phase {
            SessionPhase::InProgress { shape_index, stroke, drawing, score } => {
                (Some(*shape_index), stroke.len(), *drawing, *score, None)
            }
            SessionPhase::Completed { error } => (None, 0, false, None, error.clone()),
            SessionPhase::Submitting | SessionPhase::Submitted => (None, 0, false, None, None),
        };
        let finished = !matches!(self.phase, SessionPhase::InProgress { .. });

        SessionView {
            id: self.id,
            phase: self.phase.name(),
            canvas: self.canvas,
            shape_index,
            total_shapes: shapes::catalog().len(),
            shape: self.current_template().copied(),
            stroke_points,
            drawing,
            score,
            scores: self.scores.clone(),
            final_score: finished.then(|| self.final_score()),
            error,
        }
    }
}

/// Serializable session snapshot returned by the routes.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub phase: &'static str,
    pub canvas: CanvasSize,
    pub shape_index: Option<usize>,
    pub total_shapes: usize,
    pub shape: Option<ShapeTemplate>,
    pub stroke_points: usize,
    pub drawing: bool,
    pub score: Option<ScoreBreakdown>,
    pub scores: Vec<u8>,
    pub final_score: Option<u8>,
    pub error: Option<String>,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// How long a session may sit untouched before it is evicted.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Entry {
    session: Session,
    touched: Instant,
}

/// Live sessions keyed by id.
///
/// Every access refreshes a session's idle clock. Sessions idle longer than
/// the timeout are evicted whenever a new one is created; a session that is
/// `Submitting` is never evicted.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_SESSION_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), idle_timeout }
    }

    /// Start a new session on a canvas of the given size.
    pub async fn create(&self, canvas: CanvasSize) -> SessionView {
        let session = Session::new(Uuid::new_v4(), canvas);
        let view = session.view();

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, e| {
            e.session.phase == SessionPhase::Submitting || e.touched.elapsed() < self.idle_timeout
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, "evicted idle assessment sessions");
        }
        sessions.insert(session.id, Entry { session, touched: Instant::now() });
        drop(sessions);

        info!(session_id = %view.id, "assessment session created");
        view
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub async fn view(&self, id: Uuid) -> Result<SessionView, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        entry.touched = Instant::now();
        Ok(entry.session.view())
    }

    /// Run `f` against the session under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id, or whatever `f` returns.
    pub async fn update<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        entry.touched = Instant::now();
        f(&mut entry.session)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

// =============================================================================
// SUBMISSION
// =============================================================================

/// Persist a completed session's result.
///
/// The session is `Submitting` for the duration of the store write; on
/// failure it returns to `Completed` carrying a user-visible message and the
/// caller may submit again.
///
/// # Errors
///
/// Returns a phase error if the session is not `Completed`, or
/// [`SessionError::Submit`] if the store is unavailable or the write fails.
pub async fn submit_session(state: &AppState, id: Uuid) -> Result<SessionView, SessionError> {
    let (submission, mut snapshot) = state
        .sessions
        .update(id, |session| {
            let submission = session.begin_submit()?;
            Ok((submission, session.clone()))
        })
        .await?;

    let record = scores::build_record(
        None,
        f64::from(submission.final_score),
        submission.individual_scores.iter().map(|s| f64::from(*s)).collect(),
    );
    let outcome = scores::save_score(state.store.as_ref(), &record).await;

    let message = match &outcome {
        Ok(_) => None,
        Err(ScoresError::Unavailable) => Some(UNAVAILABLE_MESSAGE),
        Err(ScoresError::Store(_)) => Some(SUBMIT_FAILED_MESSAGE),
    };
    if let Some(message) = message {
        warn!(session_id = %id, reason = message, "session submission failed");
    }
    let finish = || message.map_or(Ok(()), |m| Err(m.to_string()));

    let view = match state
        .sessions
        .update(id, |session| {
            session.finish_submit(finish());
            Ok(session.view())
        })
        .await
    {
        Ok(view) => view,
        // Removed while the write was in flight; report the write outcome.
        Err(SessionError::NotFound(_)) => {
            warn!(session_id = %id, "session removed during submission");
            snapshot.finish_submit(finish());
            snapshot.view()
        }
        Err(e) => return Err(e),
    };

    outcome.map(|_| view).map_err(SessionError::from)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
