//! Leaflet バインディング
//!
//! index.html で読み込んだグローバル `L` を Rust から操作する。
//! マーカーの移動判定は `pawmatch_common::MarkerController` に任せる。

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::{Callable, Callback};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;
use pawmatch_common::map::{DEFAULT_ZOOM, TILE_ATTRIBUTION, TILE_URL};
use pawmatch_common::{Coordinates, MapEvent, MarkerController, POSITION_OPTIONS};

// ============================================
// オプション型
// ============================================

#[derive(Debug, Clone, Serialize)]
struct TileLayerOptions {
    attribution: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct MarkerOptions {
    draggable: bool,
}

/// `map.locate()` のオプション
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocateOptions {
    watch: bool,
    set_view: bool,
    enable_high_accuracy: bool,
    timeout: u32,
    maximum_age: u32,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            watch: true,
            // 地図の移動はこちらで行う
            set_view: false,
            enable_high_accuracy: POSITION_OPTIONS.enable_high_accuracy,
            timeout: POSITION_OPTIONS.timeout,
            maximum_age: POSITION_OPTIONS.maximum_age,
        }
    }
}

// ============================================
// JavaScript関数のextern宣言
// ============================================

#[wasm_bindgen]
extern "C" {
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn new_map(element: &HtmlElement) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, center: &JsValue, zoom: u8) -> Map;

    #[wasm_bindgen(method, js_name = panTo)]
    fn pan_to(this: &Map, center: &JsValue) -> Map;

    #[wasm_bindgen(method)]
    fn on(this: &Map, event: &str, handler: &js_sys::Function) -> Map;

    #[wasm_bindgen(method)]
    fn locate(this: &Map, options: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = stopLocate)]
    fn stop_locate(this: &Map) -> Map;

    #[wasm_bindgen(method)]
    fn remove(this: &Map) -> Map;

    #[derive(Debug, Clone)]
    pub type TileLayer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn new_tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &Map) -> TileLayer;

    #[derive(Debug, Clone)]
    pub type Marker;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn new_marker(at: &JsValue, options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = getLatLng)]
    fn get_lat_lng(this: &Marker) -> LatLng;

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &Marker, at: &JsValue) -> Marker;

    #[wasm_bindgen(method)]
    fn on(this: &Marker, event: &str, handler: &js_sys::Function) -> Marker;

    pub type LatLng;

    #[wasm_bindgen(method, getter)]
    fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method, getter)]
    fn lng(this: &LatLng) -> f64;
}

// ============================================
// ヘルパー関数
// ============================================

fn lat_lng(at: Coordinates) -> JsValue {
    let pair = js_sys::Array::of2(&JsValue::from_f64(at.lat), &JsValue::from_f64(at.lon));
    pair.into()
}

fn to_coordinates(value: &LatLng) -> Coordinates {
    Coordinates::new(value.lat(), value.lng())
}

/// click / locationfound イベントの `latlng`
fn event_coordinates(event: &JsValue) -> Option<Coordinates> {
    let value = js_sys::Reflect::get(event, &JsValue::from_str("latlng")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    Some(to_coordinates(value.unchecked_ref::<LatLng>()))
}

fn options<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

/// 要素が既に Leaflet に初期化されているか
fn is_initialized(element: &HtmlElement) -> bool {
    js_sys::Reflect::get(element, &JsValue::from_str("_leaflet_id"))
        .map(|id| !id.is_undefined() && !id.is_null())
        .unwrap_or(false)
}

// ============================================
// 地図インスタンス
// ============================================

type Listener = Closure<dyn FnMut(JsValue)>;

/// 生成した地図とマーカー
///
/// 破棄時に測位を止めて地図を取り外す。
pub struct MapHandle {
    map: Map,
    marker: Marker,
    controller: Rc<RefCell<MarkerController>>,
    _listeners: Vec<Listener>,
}

impl MapHandle {
    /// 要素に地図を生成する
    ///
    /// # Arguments
    /// * `element` - 地図を描画するコンテナ
    /// * `center` - 初期中心（マーカー位置）
    /// * `locate` - ブラウザ測位を地図側でも行うか
    /// * `on_event` - マーカー位置の変更通知
    pub fn mount(
        element: &HtmlElement,
        center: Coordinates,
        locate: bool,
        on_event: Callback<MapEvent>,
    ) -> Result<Self, JsValue> {
        if is_initialized(element) {
            return Err(JsValue::from_str("map container is already initialized"));
        }

        let map = new_map(element);
        map.set_view(&lat_lng(center), DEFAULT_ZOOM);

        new_tile_layer(TILE_URL, &options(&TileLayerOptions { attribution: TILE_ATTRIBUTION })?)
            .add_to(&map);

        let marker = new_marker(&lat_lng(center), &options(&MarkerOptions { draggable: true })?);
        marker.add_to(&map);

        let controller = Rc::new(RefCell::new(MarkerController::new(center)));
        let mut listeners: Vec<Listener> = Vec::new();

        // ドラッグ終了
        {
            let controller = Rc::clone(&controller);
            let dragged = marker.clone();
            let listener = Listener::new(move |_event: JsValue| {
                let event = MapEvent::MarkerDragEnd(to_coordinates(&dragged.get_lat_lng()));
                if controller.borrow_mut().handle(event).is_some() {
                    on_event.run(event);
                }
            });
            marker.on("dragend", listener.as_ref().unchecked_ref());
            listeners.push(listener);
        }

        // 地図クリック
        {
            let controller = Rc::clone(&controller);
            let clicked = marker.clone();
            let listener = Listener::new(move |event: JsValue| {
                let Some(at) = event_coordinates(&event) else {
                    return;
                };
                let event = MapEvent::MapClick(at);
                if controller.borrow_mut().handle(event).is_some() {
                    clicked.set_lat_lng(&lat_lng(at));
                    on_event.run(event);
                }
            });
            map.on("click", listener.as_ref().unchecked_ref());
            listeners.push(listener);
        }

        if locate {
            let controller = Rc::clone(&controller);
            let located = marker.clone();
            let view = map.clone();
            let listener = Listener::new(move |event: JsValue| {
                let Some(at) = event_coordinates(&event) else {
                    return;
                };
                let event = MapEvent::LocationFound(at);
                // 初回のみ。以降はドラッグ位置を優先
                if controller.borrow_mut().handle(event).is_some() {
                    located.set_lat_lng(&lat_lng(at));
                    view.set_view(&lat_lng(at), DEFAULT_ZOOM);
                    on_event.run(event);
                }
            });
            map.on("locationfound", listener.as_ref().unchecked_ref());
            listeners.push(listener);

            map.locate(&options(&LocateOptions::default())?);
        }

        Ok(Self {
            map,
            marker,
            controller,
            _listeners: listeners,
        })
    }

    /// 親から渡された中心へ移動（同じ座標なら何もしない）
    pub fn recenter(&self, center: Coordinates) {
        if self.controller.borrow_mut().recenter(center) {
            self.marker.set_lat_lng(&lat_lng(center));
            self.map.pan_to(&lat_lng(center));
        }
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        self.map.stop_locate();
        self.map.remove();
    }
}
