use super::AppState;
use crate::*;

pub async fn list(State(store): State<AppState>) -> Result<Markup> {
    let repos = store.repositories()?;
    ok(html! {
        section .repositories {
            h1 { "Repositories" }
            @if repos.is_empty() {
                p { "No repositories yet. They appear here once borg initializes them under the hosting directory." }
            } @else {
                table .table {
                    thead { tr { th { "Repository" } th { "State" } th { "Last update" } } }
                    tbody { @for repo in &repos { (repo) } }
                }
            }
        }
    })
}

/// Detail fragment loaded into the modal, shaped as modal-content children
pub async fn detail(State(store): State<AppState>, Path(id): Path<Uuid>) -> Result<Markup> {
    let repo = store.repository(id)?.ok_or(Error::NotFound)?;
    let events = store.events_for(id, 20)?;
    ok(html! {
        div .modal-header {
            h5 .modal-title { (repo.location()) }
            button type="button" .btn-close data-coreui-dismiss="modal" aria-label="Close" {}
        }
        div .modal-body {
            dl {
                dt { "State" }
                dd { @if repo.open { "open" } @else { "closed" } }
                dt { "Hosted since" }
                dd { (repo.created.format("%Y-%m-%d %H:%M UTC").to_string()) }
                dt { "Last update" }
                dd {
                    @if let Some(last_update) = repo.last_update {
                        (last_update.format("%Y-%m-%d %H:%M UTC").to_string())
                    } @else {
                        "never"
                    }
                }
            }
            h6 { "Recent events" }
            @if events.is_empty() {
                p { "No events recorded yet." }
            } @else {
                table .table {
                    tbody { @for event in &events { (event) } }
                }
            }
        }
    })
}
