use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Json, Redirect};
use serde_json::json;
use tally_engine::{EngineResult, Roster};
use tally_store::DocumentStore;
use tally_types::{Member, MemberId};

use crate::error::{ServerError, ServerResult};
use crate::extract::Payload;
use crate::view::{
    AssignmentRequest, AttendanceRequest, CategoryRequest, EligibilityResponse,
    EventDatesRequest, HealthResponse, HomeQuery, HomeView, ItemRequest, MemberRequest,
    RenameRequest,
};

/// Roster shared by all handlers.
pub type SharedRoster = Arc<Roster<Box<dyn DocumentStore>>>;

/// Run a roster operation off the async runtime; store I/O is blocking.
async fn run<T, F>(roster: &SharedRoster, f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Roster<Box<dyn DocumentStore>>) -> EngineResult<T> + Send + 'static,
{
    let roster = Arc::clone(roster);
    tokio::task::spawn_blocking(move || f(&roster))
        .await
        .map_err(|e| ServerError::Internal(format!("roster task failed: {e}")))?
        .map_err(ServerError::from)
}

fn home() -> Redirect {
    Redirect::to("/")
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(roster): State<SharedRoster>) -> ServerResult<Json<serde_json::Value>> {
    let doc = run(&roster, |r| r.document()).await?;
    Ok(Json(json!({
        "name": "tally-server",
        "version": env!("CARGO_PKG_VERSION"),
        "store": roster.store().describe(),
        "read_only": roster.store().is_read_only(),
        "members": doc.members.len(),
        "categories": doc.categories.len(),
        "scheduled_events": doc.event_dates.scheduled(),
    })))
}

/// Full document view, members sorted by name. When both `category` and
/// `item` are given, the eligible members are filled in as well.
pub async fn home_handler(
    State(roster): State<SharedRoster>,
    Query(query): Query<HomeQuery>,
) -> ServerResult<Json<HomeView>> {
    let view = run(&roster, move |r| {
        let doc = r.document()?;
        let eligible_members = match (&query.category, &query.item) {
            (Some(category), Some(item)) => r.engine().eligible_members(&doc, category, item),
            _ => Vec::new(),
        };
        Ok(HomeView {
            members: tally_engine::sorted_members(&doc),
            categories: doc.categories,
            event_dates: doc.event_dates,
            selected_category: query.category.unwrap_or_default(),
            selected_item: query.item.unwrap_or_default(),
            eligible_members,
        })
    })
    .await?;
    Ok(Json(view))
}

/// One member by id; the id survives renames.
pub async fn member_handler(
    State(roster): State<SharedRoster>,
    Path(id): Path<MemberId>,
) -> ServerResult<Json<Member>> {
    let member = run(&roster, move |r| r.member(&id)).await?;
    Ok(Json(member))
}

pub async fn add_member(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<MemberRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.add_member(&req.name)).await?;
    Ok(home())
}

pub async fn remove_member(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<MemberRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.remove_member(&req.name)).await?;
    Ok(home())
}

pub async fn rename_member(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<RenameRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.rename_member(&req.name, &req.new_name)).await?;
    Ok(home())
}

pub async fn add_category(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<CategoryRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.add_category(&req.category)).await?;
    Ok(home())
}

pub async fn remove_category(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<CategoryRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.remove_category(&req.category)).await?;
    Ok(home())
}

pub async fn add_item(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<ItemRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.add_item(&req.category, &req.item)).await?;
    Ok(home())
}

pub async fn remove_item(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<ItemRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.remove_item(&req.category, &req.item)).await?;
    Ok(home())
}

pub async fn assign_item(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<AssignmentRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.assign_item(&req.member, &req.category, &req.item)).await?;
    Ok(home())
}

pub async fn revoke_item(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<AssignmentRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.revoke_item(&req.member, &req.category, &req.item)).await?;
    Ok(home())
}

pub async fn update_attendance(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<AttendanceRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.update_attendance(&req.attendance)).await?;
    Ok(home())
}

pub async fn update_event_dates(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<EventDatesRequest>,
) -> ServerResult<Redirect> {
    run(&roster, move |r| r.update_event_dates(&req.slots())).await?;
    Ok(home())
}

pub async fn check_eligibility(
    State(roster): State<SharedRoster>,
    Payload(req): Payload<ItemRequest>,
) -> ServerResult<Json<EligibilityResponse>> {
    let eligible = run(&roster, move |r| r.eligible(&req.category, &req.item)).await?;
    Ok(Json(EligibilityResponse { eligible }))
}
