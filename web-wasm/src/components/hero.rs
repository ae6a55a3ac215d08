//! ランディングのヒーローと使い方

use leptos::prelude::*;

#[component]
pub fn Hero(on_get_started: Callback<()>) -> impl IntoView {
    view! {
        <section class="hero">
            <h2>"Lost or found a dog?"</h2>
            <p>
                "Report it with a photo and your location. "
                "We'll look for a match among reports from the community."
            </p>
            <button class="btn btn-primary" on:click=move |_| on_get_started.run(())>
                "Get Started"
            </button>
        </section>
    }
}

#[component]
pub fn HowItWorks() -> impl IntoView {
    let steps = [
        ("📷", "Snap a photo", "Take or upload a clear picture of the dog."),
        ("📍", "Share the location", "Use your current location or drop a pin on the map."),
        ("🔔", "Get matched", "We'll compare your report with others and show possible matches."),
    ];

    view! {
        <section class="how-it-works">
            <h2>"How it works"</h2>
            <div class="steps">
                {steps
                    .into_iter()
                    .map(|(icon, title, text)| view! {
                        <div class="step">
                            <div class="step-icon">{icon}</div>
                            <h3>{title}</h3>
                            <p class="text-muted">{text}</p>
                        </div>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}
