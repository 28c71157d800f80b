//! Data-grid primitives: the details-row presenter panel.
//!
//! The presenter sits inside a grid row template and hosts the expanded
//! row-details content. It only talks to its owning grid through
//! [`GridMetrics`], so the grid itself stays out of this crate.

use veneer_core::geometry::{Rect, Size};

/// Column and scroll metrics the presenter reads off its owning grid.
pub trait GridMetrics {
    fn cells_width(&self) -> f32;
    fn visible_edged_columns_width(&self) -> f32;
    /// Width of the spacer column that indents grouped rows.
    fn row_group_spacer_width(&self) -> f32;
    fn horizontal_offset(&self) -> f32;
    fn row_details_frozen(&self) -> bool;
    fn row_group_headers_frozen(&self) -> bool;
}

/// Child protocol: measure against a constraint, then take a slot rect.
pub trait LayoutChild {
    fn measure(&mut self, available: Size);
    fn arrange(&mut self, slot: Rect);
}

/// Hosts the details content of one data-grid row.
///
/// `content_height` starts out as NaN (unset) and is treated as zero
/// until the grid animates it to a real value.
pub struct DetailsPresenter {
    content_height: f32,
    children: Vec<Box<dyn LayoutChild>>,
    clip: Option<Rect>,
    needs_measure: bool,
}

impl DetailsPresenter {
    pub fn new() -> Self {
        Self {
            content_height: f32::NAN,
            children: Vec::new(),
            clip: None,
            needs_measure: true,
        }
    }

    pub fn push_child(&mut self, child: Box<dyn LayoutChild>) {
        self.children.push(child);
        self.needs_measure = true;
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    /// A new height invalidates measure.
    pub fn set_content_height(&mut self, height: f32) {
        let unchanged =
            height == self.content_height || (height.is_nan() && self.content_height.is_nan());
        if !unchanged {
            self.content_height = height;
            self.needs_measure = true;
        }
    }

    pub fn needs_measure(&self) -> bool {
        self.needs_measure
    }

    /// Clip applied after the last arrange pass; `None` when details are
    /// frozen (frozen details are never clipped, same as frozen cells).
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    fn effective_height(&self) -> f32 {
        if self.content_height.is_nan() {
            0.0
        } else {
            self.content_height.max(0.0)
        }
    }

    fn desired_width(&self, grid: &dyn GridMetrics) -> f32 {
        let width = if grid.row_details_frozen() {
            grid.cells_width()
        } else {
            grid.cells_width().max(grid.visible_edged_columns_width())
        };
        // details stop short of the row-group indent
        width - grid.row_group_spacer_width()
    }

    pub fn measure(&mut self, grid: &dyn GridMetrics, _available: Size) -> Size {
        if self.children.is_empty() {
            return Size::default();
        }
        if self.content_height.is_nan() {
            log::trace!("details content height not set yet; measuring at 0");
        }
        let width = self.desired_width(grid);
        for child in &mut self.children {
            child.measure(Size {
                width,
                height: f32::INFINITY,
            });
        }
        self.needs_measure = false;
        Size {
            width,
            height: self.effective_height(),
        }
    }

    pub fn arrange(&mut self, grid: &dyn GridMetrics, final_size: Size) -> Size {
        let spacer = grid.row_group_spacer_width();
        let mut left_edge = spacer;
        let mut x_clip = if grid.row_group_headers_frozen() {
            spacer
        } else {
            0.0
        };
        let mut width;
        if grid.row_details_frozen() {
            left_edge += grid.horizontal_offset();
            width = grid.cells_width();
        } else {
            x_clip += grid.horizontal_offset();
            width = grid.cells_width().max(grid.visible_edged_columns_width());
        }
        width -= spacer;
        let height = self.effective_height();

        for child in &mut self.children {
            child.arrange(Rect {
                x: left_edge,
                y: 0.0,
                w: width,
                h: height,
            });
        }

        self.clip = if grid.row_details_frozen() {
            None
        } else {
            // clip so scrolled-out details do not cover the row header
            Some(Rect {
                x: x_clip,
                y: 0.0,
                w: (width - x_clip + spacer).max(0.0),
                h: height,
            })
        };

        final_size
    }
}

impl Default for DetailsPresenter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use veneer_core::geometry::is_close;

    struct Grid {
        cells_width: f32,
        visible_edged_columns_width: f32,
        row_group_spacer_width: f32,
        horizontal_offset: f32,
        row_details_frozen: bool,
        row_group_headers_frozen: bool,
    }

    impl Default for Grid {
        fn default() -> Self {
            Self {
                cells_width: 300.0,
                visible_edged_columns_width: 350.0,
                row_group_spacer_width: 20.0,
                horizontal_offset: 0.0,
                row_details_frozen: false,
                row_group_headers_frozen: false,
            }
        }
    }

    impl GridMetrics for Grid {
        fn cells_width(&self) -> f32 {
            self.cells_width
        }
        fn visible_edged_columns_width(&self) -> f32 {
            self.visible_edged_columns_width
        }
        fn row_group_spacer_width(&self) -> f32 {
            self.row_group_spacer_width
        }
        fn horizontal_offset(&self) -> f32 {
            self.horizontal_offset
        }
        fn row_details_frozen(&self) -> bool {
            self.row_details_frozen
        }
        fn row_group_headers_frozen(&self) -> bool {
            self.row_group_headers_frozen
        }
    }

    #[derive(Default)]
    struct SlotSpy {
        slots: Rc<RefCell<Vec<Rect>>>,
        constraints: Rc<RefCell<Vec<Size>>>,
    }

    impl LayoutChild for SlotSpy {
        fn measure(&mut self, available: Size) {
            self.constraints.borrow_mut().push(available);
        }
        fn arrange(&mut self, slot: Rect) {
            self.slots.borrow_mut().push(slot);
        }
    }

    fn presenter_with_child() -> (DetailsPresenter, Rc<RefCell<Vec<Rect>>>) {
        let spy = SlotSpy::default();
        let slots = spy.slots.clone();
        let mut presenter = DetailsPresenter::new();
        presenter.push_child(Box::new(spy));
        (presenter, slots)
    }

    #[test]
    fn test_measure_unfrozen_spans_widest_columns() {
        let (mut presenter, _) = presenter_with_child();
        presenter.set_content_height(50.0);
        let size = presenter.measure(&Grid::default(), Size::default());
        assert!(is_close(size.width, 330.0)); // max(300, 350) - 20
        assert!(is_close(size.height, 50.0));
    }

    #[test]
    fn test_measure_frozen_uses_cells_width() {
        let (mut presenter, _) = presenter_with_child();
        presenter.set_content_height(50.0);
        let grid = Grid {
            row_details_frozen: true,
            ..Grid::default()
        };
        let size = presenter.measure(&grid, Size::default());
        assert!(is_close(size.width, 280.0)); // 300 - 20
    }

    #[test]
    fn test_measure_without_children_is_empty() {
        let mut presenter = DetailsPresenter::new();
        presenter.set_content_height(50.0);
        assert_eq!(presenter.measure(&Grid::default(), Size::default()), Size::default());
    }

    #[test]
    fn test_nan_content_height_measures_zero() {
        let (mut presenter, _) = presenter_with_child();
        let size = presenter.measure(&Grid::default(), Size::default());
        assert!(is_close(size.height, 0.0));

        presenter.set_content_height(-10.0);
        let size = presenter.measure(&Grid::default(), Size::default());
        assert!(is_close(size.height, 0.0));
    }

    #[test]
    fn test_set_content_height_invalidates_measure() {
        let (mut presenter, _) = presenter_with_child();
        presenter.set_content_height(50.0);
        presenter.measure(&Grid::default(), Size::default());
        assert!(!presenter.needs_measure());

        presenter.set_content_height(50.0); // unchanged, no invalidation
        assert!(!presenter.needs_measure());

        presenter.set_content_height(80.0);
        assert!(presenter.needs_measure());
    }

    #[test]
    fn test_arrange_frozen_clears_clip_and_follows_scroll() {
        let (mut presenter, slots) = presenter_with_child();
        presenter.set_content_height(50.0);
        let grid = Grid {
            row_details_frozen: true,
            horizontal_offset: 40.0,
            ..Grid::default()
        };
        presenter.arrange(&grid, Size::default());

        assert_eq!(presenter.clip(), None);
        let slots = slots.borrow();
        // spacer + horizontal offset; width = cells - spacer
        assert!(is_close(slots[0].x, 60.0));
        assert!(is_close(slots[0].w, 280.0));
        assert!(is_close(slots[0].h, 50.0));
    }

    #[test]
    fn test_arrange_unfrozen_clips_at_scroll_offset() {
        let (mut presenter, slots) = presenter_with_child();
        presenter.set_content_height(50.0);
        let grid = Grid {
            horizontal_offset: 40.0,
            ..Grid::default()
        };
        presenter.arrange(&grid, Size::default());

        let clip = presenter.clip().expect("unfrozen details are clipped");
        assert!(is_close(clip.x, 40.0)); // 0 + horizontal offset
        // width - x_clip + spacer = 330 - 40 + 20
        assert!(is_close(clip.w, 310.0));

        let slots = slots.borrow();
        assert!(is_close(slots[0].x, 20.0)); // spacer only
        assert!(is_close(slots[0].w, 330.0));
    }

    #[test]
    fn test_arrange_clip_honors_frozen_group_headers() {
        let (mut presenter, _) = presenter_with_child();
        presenter.set_content_height(50.0);
        let grid = Grid {
            horizontal_offset: 40.0,
            row_group_headers_frozen: true,
            ..Grid::default()
        };
        presenter.arrange(&grid, Size::default());

        let clip = presenter.clip().expect("unfrozen details are clipped");
        assert!(is_close(clip.x, 60.0)); // spacer + horizontal offset
    }
}
