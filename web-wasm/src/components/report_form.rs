//! 迷子犬・保護犬の通報フォーム

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use web_sys::HtmlInputElement;
use pawmatch_common::form::{format_current_location, submit_label};
use pawmatch_common::geolocation::PermissionState;
use pawmatch_common::{is_image_content_type, DogStatus, MapEvent, Notice, Report, ReportDraft};
use crate::components::location_map::LocationMap;
use crate::components::toaster::Toasts;
use crate::geolocation::use_geolocation;
use crate::photo::{preview_data_url, read_photo};

#[component]
pub fn ReportForm(
    on_submit: Callback<Report>,
    #[prop(into)] is_submitting: Signal<bool>,
) -> impl IntoView {
    let toasts = expect_context::<Toasts>();
    let draft = RwSignal::new(ReportDraft::new());

    let geo = use_geolocation(true, Callback::new(move |notice: Notice| toasts.push(notice)));

    // マウント時に許可をリクエスト
    geo.request_permission.run(());

    // 測位結果をフォームへ（地図で手動指定した後は無視される）
    Effect::new(move |_| {
        if let Some(fix) = geo.state.with(|s| s.position()) {
            draft.update(|d| {
                d.apply_geolocation_fix(fix);
            });
        }
    });

    let status = move || draft.with(|d| d.status);
    let set_status = move |value: DogStatus| draft.update(|d| d.status = value);

    let on_photo_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        if !is_image_content_type(&file.type_()) {
            toasts.push(Notice::invalid_file_type());
            return;
        }

        wasm_bindgen_futures::spawn_local(async move {
            match read_photo(&file).await {
                Ok(photo) => {
                    let preview = preview_data_url(&photo);
                    let mut rejected = false;
                    draft.update(|d| rejected = d.stage_photo(photo, Some(preview)).is_err());
                    if rejected {
                        toasts.push(Notice::invalid_file_type());
                    }
                }
                Err(e) => {
                    gloo::console::error!(format!("写真の読み込みに失敗: {:?}", e));
                    toasts.push(Notice::invalid_file_type());
                }
            }
        });
    };

    // 地図側の自動測位も許可が下りるまでは反映しない
    let on_map_event = Callback::new(move |event: MapEvent| {
        let fixes_allowed = geo.state.with_untracked(|s| s.accepts_fixes());
        draft.update(|d| d.apply_map_event(event, fixes_allowed));
    });

    let handle_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        let live_fix = geo.state.with_untracked(|s| s.position());
        let mut report = None;
        let mut outcome = Ok(());
        draft.update(|d| outcome = d.submit(live_fix, |r| report = Some(r)));

        match outcome {
            Ok(()) => {
                if let Some(report) = report {
                    on_submit.run(report);
                }
            }
            Err(e) => toasts.push(e.notice()),
        }
    };

    let center = Signal::derive(move || draft.with(|d| d.location()));
    let permission = move || geo.state.with(|s| s.permission());

    view! {
        <form class="report-form" on:submit=handle_submit>
            <h2>"Report a Dog"</h2>

            <fieldset class="form-group">
                <legend>"Status"</legend>
                <label class="radio">
                    <input
                        type="radio"
                        name="status"
                        value="lost"
                        prop:checked=move || status() == DogStatus::Lost
                        on:change=move |_| set_status(DogStatus::Lost)
                    />
                    "I lost my dog"
                </label>
                <label class="radio">
                    <input
                        type="radio"
                        name="status"
                        value="found"
                        prop:checked=move || status() == DogStatus::Found
                        on:change=move |_| set_status(DogStatus::Found)
                    />
                    "I found a dog"
                </label>
            </fieldset>

            <div class="form-group">
                <label for="description">"Description"</label>
                <textarea
                    id="description"
                    placeholder="Breed, color, size, collar, distinguishing marks..."
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.description = value);
                    }
                ></textarea>
            </div>

            <div class="form-group">
                <label for="phone">"Contact phone"</label>
                <input
                    id="phone"
                    type="tel"
                    placeholder="+1 555 123 4567"
                    prop:value=move || draft.with(|d| d.phone.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| d.phone = value);
                    }
                />
            </div>

            <div class="form-group">
                <label>"Location"</label>
                {move || match permission() {
                    PermissionState::Granted => view! {
                        <p class="location-status granted">
                            {move || {
                                let location = draft.with(|d| d.location());
                                if location.is_sentinel() {
                                    "Getting your location...".to_string()
                                } else {
                                    format_current_location(location)
                                }
                            }}
                        </p>
                    }
                    .into_any(),
                    PermissionState::Requesting => view! {
                        <p class="location-status">"Requesting location access..."</p>
                    }
                    .into_any(),
                    PermissionState::Unknown | PermissionState::Denied => view! {
                        <div class="location-status denied">
                            <p>"Location access needed"</p>
                            <button
                                type="button"
                                class="btn"
                                on:click=move |_| geo.request_permission.run(())
                            >
                                "Allow location access"
                            </button>
                        </div>
                    }
                    .into_any(),
                }}
                <p class="text-muted">"Drag the marker or click the map to adjust."</p>
                <LocationMap center=center on_event=on_map_event locate=true />
            </div>

            <div class="form-group">
                <label for="photo">"Photo"</label>
                <input id="photo" type="file" accept="image/*" on:change=on_photo_change />
                {move || {
                    draft.with(|d| d.preview_url().map(str::to_string)).map(|url| view! {
                        <img class="photo-preview" src=url alt="Dog preview" />
                    })
                }}
            </div>

            <button
                type="submit"
                class="btn btn-primary"
                disabled=move || is_submitting.get()
            >
                {move || submit_label(status(), is_submitting.get())}
            </button>
        </form>
    }
}
