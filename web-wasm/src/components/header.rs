//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"🐾 PawMatch"</h1>
            <p class="text-muted">"Reuniting lost dogs with their families"</p>
        </header>
    }
}
