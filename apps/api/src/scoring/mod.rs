// Response scoring: clarity, confidence and relevance scores plus feedback.
// The only external call is the injected sentiment classifier.

pub mod engine;
pub mod feedback;
pub mod handlers;
pub mod metrics;
