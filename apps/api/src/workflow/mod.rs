// Interview preparation workflow: session model, stage machine, and the
// orchestrator that drives the inference service.
// All inference calls go through the `InferenceService` seam; nothing here builds HTTP requests.

pub mod handlers;
pub mod orchestrator;
pub mod resume_text;
pub mod session;

#[cfg(test)]
pub mod testing;
