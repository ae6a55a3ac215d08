//! 位置指定マップ

use leptos::html;
use leptos::prelude::*;
use pawmatch_common::{Coordinates, MapEvent};
use crate::leaflet::MapHandle;

/// ドラッグ可能なマーカー付きの地図
///
/// マーカーのドラッグ終了・地図クリック・初回の自動測位で `on_event` を1回ずつ呼ぶ。
#[component]
pub fn LocationMap(
    #[prop(into)] center: Signal<Coordinates>,
    on_event: Callback<MapEvent>,
    #[prop(optional)] locate: bool,
) -> impl IntoView {
    let container: NodeRef<html::Div> = NodeRef::new();
    let handle = StoredValue::new_local(None::<MapHandle>);

    Effect::new(move |_| {
        let at = center.get();
        let Some(element) = container.get() else {
            return;
        };

        if handle.with_value(|h| h.is_some()) {
            handle.with_value(|h| {
                if let Some(map) = h {
                    map.recenter(at);
                }
            });
            return;
        }

        match MapHandle::mount(&element, at, locate, on_event) {
            Ok(map) => handle.set_value(Some(map)),
            Err(e) => gloo::console::error!(format!("地図の初期化に失敗: {:?}", e)),
        }
    });

    on_cleanup(move || {
        handle.try_update_value(|h| h.take());
    });

    view! {
        <div class="location-map" node_ref=container></div>
    }
}
