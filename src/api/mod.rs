//! Server-rendered web client for the meal planner.
//!
//! Serves the requirements form, handles form submits by generating a plan
//! and rendering it as an HTML table, and exposes the same operation as a
//! JSON endpoint. Supports CORS for the JSON endpoint.

mod handlers;
mod types;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::planner::MealPlanner;
use handlers::{handle_plan_form, handle_plan_json, index};

pub use types::{PlanForm, PlanResponse};

/// Web server wrapping a configured planner
pub struct Server {
    /// The planner used to serve generation requests
    planner: Arc<MealPlanner>,
}

/// Internal server state shared between request handlers
#[derive(Clone)]
struct ServerState {
    /// Shared reference to the planner
    planner: Arc<MealPlanner>,
}

impl Server {
    /// Creates a new server instance around the given planner
    pub fn new(planner: MealPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }

    /// Builds the router with all routes and layers.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/plan", post(handle_plan_form))
            .route("/v1/plan", post(handle_plan_json))
            .layer(CorsLayer::permissive())
            .with_state(ServerState {
                planner: self.planner.clone(),
            })
    }

    /// Starts the server and listens for requests on the specified address
    ///
    /// # Arguments
    /// * `addr` - Address to bind to (e.g. "127.0.0.1:3000")
    ///
    /// # Returns
    /// * `Ok(())` if the server ran to completion
    /// * `Err(MealPlanError)` if binding or serving fails
    pub async fn run(self, addr: &str) -> Result<(), crate::error::MealPlanError> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::MealPlanError::InvalidRequest(e.to_string()))?;

        log::info!("Listening on http://{addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| crate::error::MealPlanError::InvalidRequest(e.to_string()))?;

        Ok(())
    }
}
