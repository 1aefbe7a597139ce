use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    Form, Json,
};

use super::types::{PlanForm, PlanResponse};
use super::ServerState;
use crate::error::MealPlanError;
use crate::plan::flatten;
use crate::render::{escape_html, html_table};

/// Wraps page content in the shared HTML shell.
fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 64rem; margin: 2rem auto; padding: 0 1rem; }}\n\
         label {{ display: block; margin-top: 0.75rem; }}\n\
         input, textarea {{ width: 100%; box-sizing: border-box; padding: 0.4rem; }}\n\
         button {{ margin-top: 1rem; padding: 0.5rem 1.25rem; }}\n\
         table.plan {{ border-collapse: collapse; width: 100%; margin-top: 1rem; }}\n\
         table.plan th, table.plan td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; text-align: left; }}\n\
         pre {{ background: #f5f5f5; padding: 1rem; overflow-x: auto; }}\n\
         .error {{ color: #b00020; }}\n\
         </style>\n</head>\n<body>\n{body}\n</body>\n</html>",
        title = escape_html(title),
    ))
}

/// Serves the requirements form.
pub async fn index() -> Html<String> {
    page(
        "Structured Meal Planner",
        "<h1>Structured Meal Planner</h1>\n\
         <p>Generate a 7-day meal plan customized to your diet, caloric goals and preferences.</p>\n\
         <form method=\"post\" action=\"/plan\">\n\
         <label>Diet type\n<input name=\"diet\" value=\"Balanced\" placeholder=\"e.g. Keto, Vegan, Gluten-Free\"></label>\n\
         <label>Daily calorie target\n<input name=\"calories\" type=\"number\" value=\"2000\" min=\"1000\" max=\"4000\" step=\"100\" required></label>\n\
         <label>Preferences and dislikes\n<textarea name=\"preferences\" rows=\"3\" placeholder=\"e.g. Prefers chicken and fish, dislikes onions\"></textarea></label>\n\
         <label>Cuisine\n<input name=\"cuisine\" placeholder=\"e.g. Mediterranean\"></label>\n\
         <label>Allergens to avoid (comma-separated)\n<input name=\"allergens\" placeholder=\"e.g. peanuts, shellfish\"></label>\n\
         <button type=\"submit\">Generate Meal Plan</button>\n\
         </form>",
    )
}

/// Renders a failed generation as an error page.
fn error_page(err: &MealPlanError) -> Html<String> {
    let mut body = format!(
        "<h1>Structured Meal Planner</h1>\n<p class=\"error\">{}</p>",
        escape_html(&err.to_string())
    );
    if let MealPlanError::JsonError { raw_text, .. } = err {
        body.push_str(&format!(
            "\n<p>The model returned:</p>\n<pre>{}</pre>",
            escape_html(raw_text)
        ));
    }
    body.push_str("\n<p><a href=\"/\">Back</a></p>");
    page("Structured Meal Planner", &body)
}

/// Handles the form submit: generates a plan and renders the table page.
pub async fn handle_plan_form(
    State(state): State<ServerState>,
    Form(form): Form<PlanForm>,
) -> Html<String> {
    let request = form.into_request();
    match state.planner.generate_plan(&request).await {
        Ok(plan) => {
            let rows = flatten(&plan);
            let totals: Vec<String> = plan
                .days
                .iter()
                .map(|d| format!("{}: {} kcal", escape_html(d.day()), d.total_calories()))
                .collect();
            let body = format!(
                "<h1>Generated 7-Day Structured Meal Plan</h1>\n{}\n<p>{}</p>\n<p><a href=\"/\">New plan</a></p>",
                html_table(&rows),
                totals.join(" &middot; "),
            );
            page("Generated Meal Plan", &body)
        }
        Err(err) => {
            log::error!("Plan generation failed: {err}");
            error_page(&err)
        }
    }
}

/// Maps the error taxonomy onto HTTP status codes for the JSON endpoint.
fn error_status(err: &MealPlanError) -> StatusCode {
    match err {
        MealPlanError::AuthError(_) => StatusCode::UNAUTHORIZED,
        MealPlanError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        MealPlanError::JsonError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MealPlanError::HttpError(_)
        | MealPlanError::ProviderError(_)
        | MealPlanError::ResponseFormatError { .. }
        | MealPlanError::RetryExceeded { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// Handles JSON plan requests.
///
/// # Request Format
/// A [`PlanRequest`](crate::prompt::PlanRequest) JSON body.
///
/// # Response Format
/// The parsed plan plus its flattened table rows, or an error status with
/// the error message as the body.
pub async fn handle_plan_json(
    State(state): State<ServerState>,
    Json(request): Json<crate::prompt::PlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    match state.planner.generate_plan(&request).await {
        Ok(plan) => {
            let rows = flatten(&plan);
            Ok(Json(PlanResponse { plan, rows }))
        }
        Err(err) => {
            log::error!("Plan generation failed: {err}");
            Err((error_status(&err), err.to_string()))
        }
    }
}
