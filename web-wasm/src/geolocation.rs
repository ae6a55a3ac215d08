//! ブラウザ位置情報フック
//!
//! `navigator.geolocation` の結果を `GeolocationState` に流し込む。
//! 一度測位できたら watchPosition で追従し、コンポーネント破棄時に解除する。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::Geolocation;
use pawmatch_common::geolocation::GeolocationState;
use pawmatch_common::{Coordinates, GeoErrorKind, Notice, POSITION_OPTIONS};

/// watchPosition の登録
///
/// Drop で clearWatch する。
struct WatchHandle {
    geolocation: Geolocation,
    watch_id: i32,
    _on_success: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.geolocation.clear_watch(self.watch_id);
    }
}

/// getCurrentPosition に渡した成功・失敗コールバック
///
/// 片方しか呼ばれないので、次の測位要求かコンポーネント破棄まで両方を保持する。
/// 要求は解決するまで重ならない（`GeolocationState::begin_request`）。
struct PendingFix {
    _on_success: Closure<dyn FnMut(JsValue)>,
    _on_error: Closure<dyn FnMut(JsValue)>,
}

/// `use_geolocation` の戻り値
#[derive(Clone, Copy)]
pub struct GeolocationHandle {
    pub state: ReadSignal<GeolocationState>,
    /// 許可リクエスト（許可制の場合のみ意味を持つ）
    pub request_permission: Callback<()>,
}

/// 位置情報を購読する
///
/// # Arguments
/// * `gated` - trueなら `request_permission` まで測位しない
/// * `on_notice` - 許可の結果などユーザーに伝える通知
pub fn use_geolocation(gated: bool, on_notice: Callback<Notice>) -> GeolocationHandle {
    let initial = if gated {
        GeolocationState::gated()
    } else {
        GeolocationState::automatic()
    };
    let (state, set_state) = signal(initial);
    let watch = StoredValue::new_local(None::<WatchHandle>);
    let pending = StoredValue::new_local(None::<PendingFix>);

    let on_position = move |position: JsValue| {
        let Some(fix) = read_coordinates(&position) else {
            return;
        };
        let mut notice = None;
        set_state.update(|s| notice = s.on_position(fix));
        if let Some(notice) = notice {
            on_notice.run(notice);
        }
    };

    let on_error = move |error: JsValue| {
        let (kind, message) = read_error(&error);
        gloo::console::warn!(format!("Geolocation error: {}", message));
        let mut notice = None;
        set_state.update(|s| notice = s.on_error(kind, &message));
        if let Some(notice) = notice {
            on_notice.run(notice);
        }
    };

    let report_unsupported = move || {
        let mut notice = None;
        set_state.update(|s| notice = s.unsupported());
        if let Some(notice) = notice {
            on_notice.run(notice);
        }
    };

    // 継続的な追従を開始（二重登録しない）
    let start_watch = move |geolocation: &Geolocation| {
        if watch.with_value(|w| w.is_some()) {
            return;
        }
        let on_success = Closure::<dyn FnMut(JsValue)>::new(on_position);
        let on_failure = Closure::<dyn FnMut(JsValue)>::new(on_error);

        match geolocation.watch_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_failure.as_ref().unchecked_ref()),
            &position_options(),
        ) {
            Ok(watch_id) => watch.set_value(Some(WatchHandle {
                geolocation: geolocation.clone(),
                watch_id,
                _on_success: on_success,
                _on_error: on_failure,
            })),
            Err(e) => gloo::console::error!(format!("watchPosition failed: {:?}", e)),
        }
    };

    // 1回測位し、成功したら追従に移る
    let locate_once = move || {
        let Some(geolocation) = navigator_geolocation() else {
            report_unsupported();
            return;
        };

        let follow_up = geolocation.clone();
        let on_success: Closure<dyn FnMut(JsValue)> = Closure::once(move |position: JsValue| {
            on_position(position);
            start_watch(&follow_up);
        });
        let on_failure: Closure<dyn FnMut(JsValue)> = Closure::once(on_error);

        if let Err(e) = geolocation.get_current_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_failure.as_ref().unchecked_ref()),
            &position_options(),
        ) {
            gloo::console::error!(format!("getCurrentPosition failed: {:?}", e));
            return;
        }

        // 前回の要求は解決済みなので置き換えて解放する
        pending.set_value(Some(PendingFix {
            _on_success: on_success,
            _on_error: on_failure,
        }));
    };

    let request_permission = Callback::new(move |_: ()| {
        let mut started = false;
        set_state.update(|s| started = s.begin_request());
        if started {
            locate_once();
        }
    });

    if !gated {
        locate_once();
        if let Some(geolocation) = navigator_geolocation() {
            start_watch(&geolocation);
        }
    }

    on_cleanup(move || {
        watch.try_update_value(|w| w.take());
        pending.try_update_value(|p| p.take());
    });

    GeolocationHandle {
        state,
        request_permission,
    }
}

fn navigator_geolocation() -> Option<Geolocation> {
    let navigator = web_sys::window()?.navigator();
    let available = js_sys::Reflect::get(&navigator, &JsValue::from_str("geolocation"))
        .map(|g| !g.is_undefined() && !g.is_null())
        .unwrap_or(false);
    if !available {
        return None;
    }
    navigator.geolocation().ok()
}

fn position_options() -> web_sys::PositionOptions {
    serde_wasm_bindgen::to_value(&POSITION_OPTIONS)
        .map(|value| value.unchecked_into())
        .unwrap_or_else(|_| web_sys::PositionOptions::new())
}

/// GeolocationPosition.coords から座標を読む
fn read_coordinates(position: &JsValue) -> Option<Coordinates> {
    let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    let lat = js_sys::Reflect::get(&coords, &JsValue::from_str("latitude")).ok()?.as_f64()?;
    let lon = js_sys::Reflect::get(&coords, &JsValue::from_str("longitude")).ok()?.as_f64()?;
    Some(Coordinates::new(lat, lon))
}

/// GeolocationPositionError の code と message
fn read_error(error: &JsValue) -> (GeoErrorKind, String) {
    let code = js_sys::Reflect::get(error, &JsValue::from_str("code"))
        .ok()
        .and_then(|c| c.as_f64())
        .unwrap_or(2.0) as u16;
    let message = js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default();
    (GeoErrorKind::from_code(code), message)
}
