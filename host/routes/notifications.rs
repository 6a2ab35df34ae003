use super::AppState;
use crate::*;

pub async fn list(State(store): State<AppState>) -> Result<Markup> {
    let pref = store.alert_preference()?;
    let emails = store.emails()?;
    let pushovers = store.pushovers()?;
    ok(html! {
        section .notifications {
            h1 { "Notifications" }
            form .alert-preference method="post" action="/notifications/preference" {
                label {
                    input type="checkbox" name="enabled" checked[pref.enabled];
                    " Alert when repositories stop updating"
                }
                label {
                    "Alert after (hours) "
                    input type="number" name="interval_hours" min="1" value=(pref.interval_hours);
                }
                button type="submit" { "Save preference" }
            }

            h2 { "Email targets" }
            (modal_trigger("/notifications/email/new", "Add email target"))
            @if emails.is_empty() {
                p { "No email targets configured." }
            } @else {
                table .table { tbody { @for target in &emails {
                    tr {
                        td { (target.email) }
                        td { (modal_trigger(&format!("/notifications/email/{}/edit", target.id), "Edit")) }
                        td {
                            form method="post" action=(format!("/notifications/email/{}/delete", target.id)) {
                                button type="submit" { "Delete" }
                            }
                        }
                    }
                }}}
            }

            h2 { "Pushover targets" }
            (modal_trigger("/notifications/pushover/new", "Add pushover target"))
            @if pushovers.is_empty() {
                p { "No pushover targets configured." }
            } @else {
                table .table { tbody { @for target in &pushovers {
                    tr {
                        td { (target.name) }
                        td { (modal_trigger(&format!("/notifications/pushover/{}/edit", target.id), "Edit")) }
                        td {
                            form method="post" action=(format!("/notifications/pushover/{}/delete", target.id)) {
                                button type="submit" { "Delete" }
                            }
                        }
                    }
                }}}
            }
        }
    })
}

#[derive(Deserialize)]
pub struct PreferenceForm {
    enabled: Option<String>,
    interval_hours: u64,
}

pub async fn save_preference(
    State(store): State<AppState>,
    Form(form): Form<PreferenceForm>,
) -> Result<Redirect> {
    store.save_alert_preference(&AlertPreference {
        enabled: form.enabled.is_some(),
        interval_hours: form.interval_hours.max(1),
    })?;
    ok(Redirect::to("/notifications"))
}

// --- email targets ---

#[derive(Deserialize)]
pub struct EmailForm {
    id: Option<Uuid>,
    email: String,
}

pub async fn email_form() -> Markup {
    email_form_markup(None)
}

pub async fn edit_email_form(
    State(store): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Markup> {
    let target = store.email(id)?.ok_or(Error::NotFound)?;
    ok(email_form_markup(Some(&target)))
}

pub async fn save_email(
    State(store): State<AppState>,
    Form(form): Form<EmailForm>,
) -> Result<Redirect> {
    let target = EmailNotification {
        id: form.id.unwrap_or_else(Uuid::now_v7),
        email: form.email,
    };
    store.save_email(&target)?;
    ok(Redirect::to("/notifications"))
}

pub async fn delete_email(
    State(store): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect> {
    store.remove_email(id)?;
    ok(Redirect::to("/notifications"))
}

fn email_form_markup(target: Option<&EmailNotification>) -> Markup {
    html! {
        div .modal-header {
            h5 .modal-title {
                @if target.is_some() { "Edit email target" } @else { "New email target" }
            }
            button type="button" .btn-close data-coreui-dismiss="modal" aria-label="Close" {}
        }
        div .modal-body {
            form method="post" action="/notifications/email" {
                @if let Some(target) = target {
                    input type="hidden" name="id" value=(target.id.to_string());
                }
                label {
                    "Email "
                    input type="email" name="email" required value=[target.map(|t| &t.email)];
                }
                button type="submit" { "Save" }
            }
        }
    }
}

// --- pushover targets ---

#[derive(Deserialize)]
pub struct PushoverForm {
    id: Option<Uuid>,
    name: String,
    user: String,
    token: String,
}

pub async fn pushover_form() -> Markup {
    pushover_form_markup(None)
}

pub async fn edit_pushover_form(
    State(store): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Markup> {
    let target = store.pushover(id)?.ok_or(Error::NotFound)?;
    ok(pushover_form_markup(Some(&target)))
}

pub async fn save_pushover(
    State(store): State<AppState>,
    Form(form): Form<PushoverForm>,
) -> Result<Redirect> {
    let target = PushoverNotification {
        id: form.id.unwrap_or_else(Uuid::now_v7),
        name: form.name,
        user: form.user,
        token: form.token,
    };
    store.save_pushover(&target)?;
    ok(Redirect::to("/notifications"))
}

pub async fn delete_pushover(
    State(store): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect> {
    store.remove_pushover(id)?;
    ok(Redirect::to("/notifications"))
}

fn pushover_form_markup(target: Option<&PushoverNotification>) -> Markup {
    html! {
        div .modal-header {
            h5 .modal-title {
                @if target.is_some() { "Edit pushover target" } @else { "New pushover target" }
            }
            button type="button" .btn-close data-coreui-dismiss="modal" aria-label="Close" {}
        }
        div .modal-body {
            form method="post" action="/notifications/pushover" {
                @if let Some(target) = target {
                    input type="hidden" name="id" value=(target.id.to_string());
                }
                label { "Name " input type="text" name="name" required value=[target.map(|t| &t.name)]; }
                label { "User key " input type="text" name="user" required value=[target.map(|t| &t.user)]; }
                label { "API token " input type="text" name="token" required value=[target.map(|t| &t.token)]; }
                button type="submit" { "Save" }
            }
        }
    }
}
