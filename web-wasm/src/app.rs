//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use pawmatch_common::{BackendConfig, PageState, Report};
use crate::api::whatsapp::submit_report;
use crate::components::{
    header::Header,
    hero::{Hero, HowItWorks},
    match_results::MatchResults,
    report_form::ReportForm,
    toaster::{Toaster, Toasts},
};

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let toasts = Toasts::new();
    provide_context(toasts);

    // ビルド種別で送信先を切り替える
    let config = StoredValue::new(BackendConfig::for_build());
    let asset_base = config.with_value(|c| c.asset_base.clone());

    let page = RwSignal::new(PageState::new());
    let is_submitting = Signal::derive(move || page.with(|p| p.is_submitting()));
    let matches = Signal::derive(move || page.with(|p| p.matches().to_vec()));

    let on_get_started = Callback::new(move |_: ()| page.update(|p| p.get_started()));

    let on_submit = Callback::new(move |report: Report| {
        let mut started = false;
        page.update(|p| started = p.begin_submit());
        if !started {
            return;
        }

        let config = config.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = submit_report(&report, &config).await;
            if let Err(e) = &outcome {
                gloo::console::error!(format!("Error submitting dog report: {:?}", e));
            }

            let mut notice = None;
            page.update(|p| notice = p.finish_submit(outcome));
            if let Some(notice) = notice {
                toasts.push(notice);
            }
        });
    });

    let on_close = Callback::new(move |_: ()| page.update(|p| p.dismiss_matches()));

    view! {
        <div class="container">
            <Header />

            <main>
                <Show
                    when=move || page.with(|p| p.show_form())
                    fallback=move || view! {
                        <Hero on_get_started=on_get_started />
                        <HowItWorks />
                    }
                >
                    <ReportForm on_submit=on_submit is_submitting=is_submitting />
                </Show>
            </main>

            <Show when=move || page.with(|p| p.show_matches())>
                <MatchResults matches=matches asset_base=asset_base.clone() on_close=on_close />
            </Show>

            <Toaster toasts=toasts />
        </div>
    }
}
