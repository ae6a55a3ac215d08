//! 地図マーカーの制御
//!
//! ドラッグ終了・地図クリック・初回の自動測位でのみ変更を通知する。
//! 2回目以降の自動測位はユーザーのドラッグと競合するので無視する。

use crate::types::Coordinates;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub const DEFAULT_ZOOM: u8 = 13;

/// 地図上のイベント
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    MarkerDragEnd(Coordinates),
    MapClick(Coordinates),
    LocationFound(Coordinates),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerController {
    marker: Coordinates,
    first_fix_taken: bool,
}

impl MarkerController {
    pub fn new(center: Coordinates) -> Self {
        Self {
            marker: center,
            first_fix_taken: false,
        }
    }

    pub fn marker(&self) -> Coordinates {
        self.marker
    }

    pub fn first_fix_taken(&self) -> bool {
        self.first_fix_taken
    }

    /// イベントを処理し、通知すべき座標を返す
    pub fn handle(&mut self, event: MapEvent) -> Option<Coordinates> {
        match event {
            MapEvent::MarkerDragEnd(at) | MapEvent::MapClick(at) => {
                self.marker = at;
                Some(at)
            }
            MapEvent::LocationFound(at) => {
                if self.first_fix_taken {
                    return None;
                }
                self.first_fix_taken = true;
                self.marker = at;
                Some(at)
            }
        }
    }

    /// 親から新しい中心が渡された
    ///
    /// # Returns
    /// マーカーを動かす必要があればtrue
    pub fn recenter(&mut self, center: Coordinates) -> bool {
        if center == self.marker {
            return false;
        }
        self.marker = center;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(controller: &mut MarkerController, events: &[MapEvent]) -> Vec<Coordinates> {
        events.iter().filter_map(|e| controller.handle(*e)).collect()
    }

    #[test]
    fn test_drag_end_fires_once() {
        let mut controller = MarkerController::new(Coordinates::SENTINEL);
        let fired = collect(&mut controller, &[MapEvent::MarkerDragEnd(Coordinates::new(1.0, 2.0))]);
        assert_eq!(fired, vec![Coordinates::new(1.0, 2.0)]);
        assert_eq!(controller.marker(), Coordinates::new(1.0, 2.0));
    }

    #[test]
    fn test_map_click_fires() {
        let mut controller = MarkerController::new(Coordinates::SENTINEL);
        assert_eq!(
            controller.handle(MapEvent::MapClick(Coordinates::new(3.0, 4.0))),
            Some(Coordinates::new(3.0, 4.0))
        );
    }

    #[test]
    fn test_only_first_location_fix_fires() {
        let mut controller = MarkerController::new(Coordinates::SENTINEL);
        let fired = collect(
            &mut controller,
            &[
                MapEvent::LocationFound(Coordinates::new(1.0, 1.0)),
                MapEvent::LocationFound(Coordinates::new(1.1, 1.1)),
                MapEvent::LocationFound(Coordinates::new(1.2, 1.2)),
            ],
        );
        assert_eq!(fired, vec![Coordinates::new(1.0, 1.0)]);
        assert!(controller.first_fix_taken());
    }

    #[test]
    fn test_location_fix_after_drag_does_not_move_marker() {
        let mut controller = MarkerController::new(Coordinates::SENTINEL);
        controller.handle(MapEvent::LocationFound(Coordinates::new(1.0, 1.0)));
        controller.handle(MapEvent::MarkerDragEnd(Coordinates::new(5.0, 5.0)));

        assert!(controller.handle(MapEvent::LocationFound(Coordinates::new(1.0, 1.0))).is_none());
        assert_eq!(controller.marker(), Coordinates::new(5.0, 5.0));
    }

    #[test]
    fn test_recenter() {
        let mut controller = MarkerController::new(Coordinates::new(1.0, 1.0));
        assert!(!controller.recenter(Coordinates::new(1.0, 1.0)));
        assert!(controller.recenter(Coordinates::new(2.0, 2.0)));
        assert_eq!(controller.marker(), Coordinates::new(2.0, 2.0));
    }

    #[test]
    fn test_recenter_after_emit_is_noop() {
        let mut controller = MarkerController::new(Coordinates::SENTINEL);
        let emitted = controller.handle(MapEvent::MapClick(Coordinates::new(7.0, 8.0))).unwrap();
        // 親が通知された座標をそのまま中心に戻してもマーカーは動かない
        assert!(!controller.recenter(emitted));
    }
}
