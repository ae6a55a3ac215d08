//! 通知（トースト）
//!
//! `Toasts` をコンテキストで配り、どのコンポーネントからでも通知を積めるようにする。

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use pawmatch_common::Notice;

/// 自動で消えるまでの時間（ミリ秒）
const DISMISS_AFTER_MS: u32 = 5_000;

#[derive(Clone, Copy)]
pub struct Toasts {
    items: RwSignal<Vec<(u64, Notice)>>,
    next_id: StoredValue<u64>,
}

impl Toasts {
    pub fn new() -> Self {
        Self {
            items: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn push(&self, notice: Notice) {
        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        self.items.update(|items| items.push((id, notice)));

        let items = self.items;
        Timeout::new(DISMISS_AFTER_MS, move || {
            items.try_update(|items| items.retain(|(i, _)| *i != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.items.update(|items| items.retain(|(i, _)| *i != id));
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

#[component]
pub fn Toaster(toasts: Toasts) -> impl IntoView {
    view! {
        <div class="toaster">
            <For
                each=move || toasts.items.get()
                key=|(id, _)| *id
                children=move |(id, notice)| {
                    let class = format!("toast toast-{}", notice.variant.as_str());
                    view! {
                        <div class=class role="status">
                            <div class="toast-body">
                                <strong>{notice.title}</strong>
                                <p>{notice.description}</p>
                            </div>
                            <button class="toast-close" on:click=move |_| toasts.dismiss(id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}
