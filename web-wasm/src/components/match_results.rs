//! マッチ候補の一覧（モーダル）

use leptos::prelude::*;
use web_sys::HtmlImageElement;
use pawmatch_common::presentation::{results_summary, FALLBACK_IMAGE_URL};
use pawmatch_common::{MatchCard, MatchRecord};

#[component]
pub fn MatchResults(
    #[prop(into)] matches: Signal<Vec<MatchRecord>>,
    #[prop(into)] asset_base: String,
    on_close: Callback<()>,
) -> impl IntoView {
    let cards = move || {
        matches.with(|records| {
            records
                .iter()
                .map(|record| MatchCard::from_record(record, &asset_base))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="modal-backdrop">
            <div class="modal" role="dialog">
                <h2>"Potential Matches"</h2>
                <p class="text-muted">{move || matches.with(|m| results_summary(m.len()))}</p>

                <div class="match-grid">
                    <For
                        each=cards
                        key=|card| card.id.clone()
                        children=|card| view! { <DogMatchCard card=card /> }
                    />
                </div>

                <div class="modal-actions">
                    <button class="btn" on:click=move |_| on_close.run(())>"Close"</button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn DogMatchCard(card: MatchCard) -> impl IntoView {
    let percentage = card.percentage_label();

    let view_location = {
        let url = card.map_url.clone();
        move |_| {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.open_with_url_and_target(&url, "_blank") {
                    gloo::console::error!(format!("地図を開けません: {:?}", e));
                }
            }
        }
    };

    let call_owner = {
        let tel = card.tel_uri.clone();
        move |_| {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(&tel) {
                    gloo::console::error!(format!("発信できません: {:?}", e));
                }
            }
        }
    };

    // サーバー画像が取れなければ代替画像（1回だけ）
    let on_image_error = move |ev: leptos::ev::ErrorEvent| {
        let img: HtmlImageElement = event_target(&ev);
        if img.src() != FALLBACK_IMAGE_URL {
            img.set_src(FALLBACK_IMAGE_URL);
        }
    };

    view! {
        <div class="match-card">
            <div class="match-image">
                <img src=card.image_url alt=card.title.clone() on:error=on_image_error />
                <span class="match-badge">{percentage}</span>
            </div>
            <div class="match-body">
                <h3>{card.title}</h3>
                <p>{card.description}</p>
                <p class="text-muted">"📍 " {card.coordinates_label}</p>
            </div>
            <div class="match-actions">
                <button class="btn" on:click=view_location>"View Location"</button>
                <button class="btn btn-primary" on:click=call_owner>"Call Owner"</button>
            </div>
        </div>
    }
}
