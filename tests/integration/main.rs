mod activation;
mod helpers;
mod placement;
mod render_pipeline;
mod sidebar_lifecycle;
