//! Fit/flex layout solver
//!
//! Each axis resolves independently in two passes, then one pass assigns
//! positions and scissor rects:
//!
//! 1. **Fit**, bottom-up: text leaves take their rounded advance sum, fixed
//!    specs override, containers sum children along their layout axis (plus
//!    gaps) and take the max across it, plus their own padding.
//! 2. **Flex**, top-down: positive leftover space grows flexible children
//!    proportionally to weight; negative leftover shrinks children not
//!    flagged NO_SHRINK proportionally, floored at zero. Cross-axis
//!    children independently grow or shrink toward the parent's full cross
//!    size.
//! 3. **Position**, top-down: a cursor advances through flow children in
//!    call order (from the trailing edge under LAYOUT_FROM_END);
//!    NO_AUTO_OFFSET boxes take their float offset instead and do not
//!    occupy flow space in either fit sums or flex distribution. A box's
//!    clipped rect is its rect intersected with the parent's scissor,
//!    unless it carries NO_CLIP.
//!
//! Nodes are created parent-before-child, so ascending slot order is
//! top-down and descending order is bottom-up; the solver leans on that
//! instead of an explicit traversal stack.

use flick_core::{Axis, Point, Rect, Size};
use flick_paint::{measure_text, RenderBackend};
use smallvec::SmallVec;
use tracing::trace;

use crate::flags::BoxFlags;
use crate::style::SizeSpec;
use crate::tree::{BoxIndex, Generation};

fn point_along(point: Point, axis: Axis) -> f32 {
    match axis {
        Axis::X => point.x,
        Axis::Y => point.y,
    }
}

fn point_set_along(point: &mut Point, axis: Axis, value: f32) {
    match axis {
        Axis::X => point.x = value,
        Axis::Y => point.y = value,
    }
}

/// Resolve sizes, positions, and scissor rects for the whole generation
pub(crate) fn solve(
    generation: &mut Generation,
    root: BoxIndex,
    viewport: Size,
    backend: &mut dyn RenderBackend,
) {
    fit_pass(generation, Axis::X, backend);
    fit_pass(generation, Axis::Y, backend);

    let root_node = generation.get_mut(root);
    root_node.size = root_node.unexpanded;
    flex_pass(generation);
    position_pass(generation, root, viewport);

    trace!(boxes = generation.len(), "layout solved");
}

/// Bottom-up unexpanded sizing along one axis
fn fit_pass(generation: &mut Generation, axis: Axis, backend: &mut dyn RenderBackend) {
    for index in (0..generation.len() as BoxIndex).rev() {
        let node = generation.get(index);
        let padding = node.style.padding.along(axis);
        let value = match node.spec_along(axis) {
            SizeSpec::Fixed(value) => value,
            SizeSpec::Fit | SizeSpec::Flex(_) => {
                if let Some(text) = &node.text {
                    let measured =
                        measure_text(backend, node.style.font, node.style.font_size, text);
                    measured.along(axis) + padding
                } else {
                    let layout_axis = node.axis;
                    let gap = node.style.gap;
                    let mut sum = 0.0f32;
                    let mut max = 0.0f32;
                    let mut flow_children = 0usize;
                    for child in generation.children(index) {
                        let child = generation.get(child);
                        if child.flags.contains(BoxFlags::NO_AUTO_OFFSET) {
                            continue;
                        }
                        let child_size = child.unexpanded.along(axis);
                        sum += child_size;
                        max = max.max(child_size);
                        flow_children += 1;
                    }
                    let content = if axis == layout_axis {
                        sum + gap * flow_children.saturating_sub(1) as f32
                    } else {
                        max
                    };
                    content + padding
                }
            }
        };
        generation.get_mut(index).unexpanded.set_along(axis, value);
    }
}

/// Top-down flex distribution; every parent sizes its children
fn flex_pass(generation: &mut Generation) {
    for index in 0..generation.len() as BoxIndex {
        distribute(generation, index);
    }
}

fn distribute(generation: &mut Generation, parent: BoxIndex) {
    let node = generation.get(parent);
    let axis = node.axis;
    let cross = axis.cross();
    let gap = node.style.gap;
    let content_main = node.size.along(axis) - node.style.padding.along(axis);
    let content_cross = (node.size.along(cross) - node.style.padding.along(cross)).max(0.0);

    let children: SmallVec<[BoxIndex; 16]> = generation.children(parent).collect();
    if children.is_empty() {
        return;
    }

    let mut flow: SmallVec<[BoxIndex; 16]> = SmallVec::new();
    for &child in &children {
        let child_node = generation.get(child);
        if child_node.flags.contains(BoxFlags::NO_AUTO_OFFSET) {
            // Floats size against the parent's content box directly
            let mut size = child_node.unexpanded;
            if child_node.spec_along(axis).is_flex() {
                size.set_along(axis, content_main.max(0.0));
            }
            if child_node.spec_along(cross).is_flex() {
                size.set_along(cross, content_cross);
            }
            generation.get_mut(child).size = size;
        } else {
            flow.push(child);
        }
    }
    if flow.is_empty() {
        return;
    }

    let gaps = gap * (flow.len() - 1) as f32;
    let used: f32 = flow
        .iter()
        .map(|&child| generation.get(child).unexpanded.along(axis))
        .sum();
    let leftover = content_main - gaps - used;

    // Main axis: grow flexible children, or shrink the shrinkable ones
    if leftover > 0.0 {
        let total_weight: f32 = flow
            .iter()
            .map(|&child| generation.get(child))
            .filter(|child| child.spec_along(axis).is_flex())
            .map(|child| child.spec_along(axis).weight())
            .sum();
        for &child in &flow {
            let child_node = generation.get(child);
            let mut size = child_node.unexpanded.along(axis);
            if total_weight > 0.0 && child_node.spec_along(axis).is_flex() {
                size += leftover * child_node.spec_along(axis).weight() / total_weight;
            }
            generation.get_mut(child).size.set_along(axis, size);
        }
    } else {
        let deficit = -leftover;
        let total_weight: f32 = flow
            .iter()
            .map(|&child| generation.get(child))
            .filter(|child| !child.flags.contains(BoxFlags::NO_SHRINK))
            .map(|child| child.spec_along(axis).weight())
            .sum();
        for &child in &flow {
            let child_node = generation.get(child);
            let mut size = child_node.unexpanded.along(axis);
            if deficit > 0.0
                && total_weight > 0.0
                && !child_node.flags.contains(BoxFlags::NO_SHRINK)
            {
                let share = deficit * child_node.spec_along(axis).weight() / total_weight;
                // Floor at zero: severe over-constraint overflows and gets
                // scissored instead of going negative
                size = (size - share).max(0.0);
            }
            generation.get_mut(child).size.set_along(axis, size);
        }
    }

    // Cross axis: each child independently against the full content size
    for &child in &flow {
        let child_node = generation.get(child);
        let unexpanded = child_node.unexpanded.along(cross);
        let size = if child_node.spec_along(cross).is_flex() {
            content_cross
        } else if unexpanded > content_cross && !child_node.flags.contains(BoxFlags::NO_SHRINK) {
            content_cross
        } else {
            unexpanded
        };
        generation.get_mut(child).size.set_along(cross, size);
    }
}

/// Top-down position and scissor assignment
fn position_pass(generation: &mut Generation, root: BoxIndex, viewport: Size) {
    let viewport_rect = Rect::from_origin_size(Point::ZERO, viewport);
    {
        let root_node = generation.get_mut(root);
        root_node.position = Point::ZERO;
        root_node.clipped = root_node.rect().intersect(&viewport_rect);
    }

    for index in 0..generation.len() as BoxIndex {
        let node = generation.get(index);
        let axis = node.axis;
        let cross = axis.cross();
        let gap = node.style.gap;
        let from_end = node.flags.contains(BoxFlags::LAYOUT_FROM_END);
        let position = node.position;
        let size = node.size;
        let padding = node.style.padding;
        let scissor = node.clipped;

        let mut cursor = if from_end {
            point_along(position, axis) + size.along(axis) - padding.end(axis)
        } else {
            point_along(position, axis) + padding.start(axis)
        };
        let cross_start = point_along(position, cross) + padding.start(cross);

        let children: SmallVec<[BoxIndex; 16]> = generation.children(index).collect();
        for child in children {
            let child_node = generation.get(child);
            let child_size = child_node.size;
            let no_clip = child_node.flags.contains(BoxFlags::NO_CLIP);
            let mut child_position = Point::ZERO;
            if child_node.flags.contains(BoxFlags::NO_AUTO_OFFSET) {
                child_position = position + child_node.float_offset;
            } else {
                if from_end {
                    cursor -= child_size.along(axis);
                    point_set_along(&mut child_position, axis, cursor);
                    cursor -= gap;
                } else {
                    point_set_along(&mut child_position, axis, cursor);
                    cursor += child_size.along(axis) + gap;
                }
                point_set_along(&mut child_position, cross, cross_start);
            }
            let child_node = generation.get_mut(child);
            child_node.position = child_position;
            let rect = child_node.rect();
            child_node.clipped = if no_clip {
                rect
            } else {
                rect.intersect(&scissor)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use flick_core::{Axis, Point, Rect, Size};
    use flick_paint::HeadlessBackend;

    use crate::builder::BoxSpec;
    use crate::context::Context;
    use crate::key::Key;
    use crate::style::SizeSpec;

    fn frame(ctx: &mut Context, backend: &mut HeadlessBackend, build: impl FnOnce(&mut Context)) {
        ctx.begin_frame(Size::new(200.0, 100.0), 1.0 / 60.0);
        build(ctx);
        ctx.end_frame(backend);
    }

    fn rect_of(ctx: &Context, key: Key) -> Rect {
        // After end_frame the solved tree is the arena's current generation
        let generation = ctx.arena().current();
        let index = generation.lookup(key).expect("box not found");
        generation.get(index).rect()
    }

    #[test]
    fn test_fit_container_sums_fixed_children_plus_padding() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let panel = Key::from_label("panel");
        frame(&mut ctx, &mut backend, |ctx| {
            let p = ctx.add_box(BoxSpec::new(panel).layout_x().padding(5.0).gap(2.0));
            ctx.push(p);
            ctx.add_box(BoxSpec::new(Key::from_label("a")).fixed(30.0, 10.0));
            ctx.add_box(BoxSpec::new(Key::from_label("b")).fixed(40.0, 25.0));
            ctx.pop(p);
        });
        let rect = rect_of(&ctx, panel);
        // width: 30 + 40 + gap 2 + padding 10; height: max(10, 25) + 10
        assert_eq!(rect.size, Size::new(82.0, 35.0));
    }

    #[test]
    fn test_flex_grows_in_weight_ratio() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (a, b) = (Key::from_label("a"), Key::from_label("b"));
        frame(&mut ctx, &mut backend, |ctx| {
            let row = ctx.add_box(
                BoxSpec::new(Key::from_label("row"))
                    .layout_x()
                    .fixed(90.0, 20.0),
            );
            ctx.push(row);
            ctx.add_box(BoxSpec::new(a).flex_width(1.0).fixed_height(20.0));
            ctx.add_box(BoxSpec::new(b).flex_width(2.0).fixed_height(20.0));
            ctx.pop(row);
        });
        // Leftover 90 split 1:2
        assert_eq!(rect_of(&ctx, a).width(), 30.0);
        assert_eq!(rect_of(&ctx, b).width(), 60.0);
    }

    #[test]
    fn test_two_equal_flex_children_split_root() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (a, b) = (Key::from_label("childA"), Key::from_label("childB"));
        let root_key = Key::from_label("container");
        frame(&mut ctx, &mut backend, |ctx| {
            let container = ctx.add_box(
                BoxSpec::new(root_key)
                    .layout_x()
                    .size(SizeSpec::Flex(1.0), SizeSpec::Flex(1.0)),
            );
            ctx.push(container);
            ctx.add_box(BoxSpec::new(a).flex_width(1.0).fixed_height(20.0));
            ctx.add_box(BoxSpec::new(b).flex_width(1.0).fixed_height(20.0));
            ctx.pop(container);
        });
        // Container fills the 200-wide viewport; each child takes half
        let (ra, rb) = (rect_of(&ctx, a), rect_of(&ctx, b));
        assert_eq!(ra.size, Size::new(100.0, 20.0));
        assert_eq!(rb.size, Size::new(100.0, 20.0));
        assert_eq!(ra.origin, Point::ZERO);
        assert_eq!(rb.origin, Point::new(100.0, 0.0));
    }

    #[test]
    fn test_shrink_is_proportional_and_floored_at_zero() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (a, b) = (Key::from_label("a"), Key::from_label("b"));
        frame(&mut ctx, &mut backend, |ctx| {
            let row = ctx.add_box(
                BoxSpec::new(Key::from_label("row"))
                    .layout_x()
                    .fixed(40.0, 20.0),
            );
            ctx.push(row);
            ctx.add_box(BoxSpec::new(a).fixed(60.0, 20.0));
            ctx.add_box(BoxSpec::new(b).fixed(20.0, 20.0));
            ctx.pop(row);
        });
        // Deficit 40 splits evenly (weight 1 each): 60-20=40, 20-20 floors at 0
        assert_eq!(rect_of(&ctx, a).width(), 40.0);
        assert_eq!(rect_of(&ctx, b).width(), 0.0);
    }

    #[test]
    fn test_no_shrink_child_keeps_size() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (a, b) = (Key::from_label("a"), Key::from_label("b"));
        frame(&mut ctx, &mut backend, |ctx| {
            let row = ctx.add_box(
                BoxSpec::new(Key::from_label("row"))
                    .layout_x()
                    .fixed(50.0, 20.0),
            );
            ctx.push(row);
            ctx.add_box(BoxSpec::new(a).fixed(40.0, 20.0).no_shrink());
            ctx.add_box(BoxSpec::new(b).fixed(40.0, 20.0));
            ctx.pop(row);
        });
        assert_eq!(rect_of(&ctx, a).width(), 40.0);
        assert_eq!(rect_of(&ctx, b).width(), 10.0);
    }

    #[test]
    fn test_cross_axis_flex_fills_parent() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let child = Key::from_label("child");
        frame(&mut ctx, &mut backend, |ctx| {
            let row = ctx.add_box(
                BoxSpec::new(Key::from_label("row"))
                    .layout_x()
                    .fixed(100.0, 50.0),
            );
            ctx.push(row);
            ctx.add_box(BoxSpec::new(child).fixed_width(10.0).flex_height(1.0));
            ctx.pop(row);
        });
        assert_eq!(rect_of(&ctx, child).height(), 50.0);
    }

    #[test]
    fn test_text_leaf_sizes_to_advance_sum_plus_padding() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let label = Key::from_label("label");
        frame(&mut ctx, &mut backend, |ctx| {
            // Headless advance is half the 14px default font size
            ctx.add_box(BoxSpec::new(label).text("abcd").padding(3.0));
        });
        let rect = rect_of(&ctx, label);
        assert_eq!(rect.width(), 4.0 * 7.0 + 6.0);
        assert_eq!(rect.height(), 14.0 + 6.0);
    }

    #[test]
    fn test_layout_from_end_places_first_child_at_trailing_edge() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (a, b) = (Key::from_label("a"), Key::from_label("b"));
        frame(&mut ctx, &mut backend, |ctx| {
            let row = ctx.add_box(
                BoxSpec::new(Key::from_label("row"))
                    .layout_x()
                    .layout_from_end()
                    .fixed(100.0, 20.0),
            );
            ctx.push(row);
            ctx.add_box(BoxSpec::new(a).fixed(10.0, 10.0));
            ctx.add_box(BoxSpec::new(b).fixed(10.0, 10.0));
            ctx.pop(row);
        });
        assert_eq!(rect_of(&ctx, a).x(), 90.0);
        assert_eq!(rect_of(&ctx, b).x(), 80.0);
    }

    #[test]
    fn test_float_offset_and_flow_exclusion() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (float, flow) = (Key::from_label("float"), Key::from_label("flow"));
        frame(&mut ctx, &mut backend, |ctx| {
            let panel = ctx.add_box(BoxSpec::new(Key::from_label("panel")).fixed(100.0, 100.0));
            ctx.push(panel);
            ctx.add_box(BoxSpec::new(float).fixed(10.0, 10.0).offset(30.0, 40.0));
            ctx.add_box(BoxSpec::new(flow).fixed(10.0, 10.0));
            ctx.pop(panel);
        });
        // The float lands at its offset; the flow child still starts at the top
        assert_eq!(rect_of(&ctx, float).origin, Point::new(30.0, 40.0));
        assert_eq!(rect_of(&ctx, flow).origin, Point::ZERO);
    }

    #[test]
    fn test_scissor_intersection_and_suppression() {
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (clipped, escaped) = (Key::from_label("clipped"), Key::from_label("escaped"));
        frame(&mut ctx, &mut backend, |ctx| {
            let panel = ctx.add_box(BoxSpec::new(Key::from_label("panel")).fixed(50.0, 50.0));
            ctx.push(panel);
            ctx.add_box(BoxSpec::new(clipped).fixed(80.0, 10.0).no_shrink());
            ctx.add_box(BoxSpec::new(escaped).fixed(80.0, 10.0).no_shrink().no_clip());
            ctx.pop(panel);
        });
        let generation = ctx.arena().current();
        let clipped_node = generation.get(generation.lookup(clipped).unwrap());
        assert_eq!(clipped_node.clipped.width(), 50.0);
        let escaped_node = generation.get(generation.lookup(escaped).unwrap());
        assert_eq!(escaped_node.clipped.width(), 80.0);
    }

    #[test]
    fn test_axis_reports_are_consistent() {
        // Column layout: children stack in Y, widths resolve independently
        let mut backend = HeadlessBackend::new();
        let mut ctx = Context::new();
        let (a, b) = (Key::from_label("a"), Key::from_label("b"));
        frame(&mut ctx, &mut backend, |ctx| {
            let col = ctx.add_box(BoxSpec::new(Key::from_label("col")).fixed(60.0, 100.0));
            ctx.push(col);
            ctx.add_box(BoxSpec::new(a).fixed(20.0, 30.0));
            ctx.add_box(BoxSpec::new(b).fixed(20.0, 30.0));
            ctx.pop(col);
        });
        assert_eq!(rect_of(&ctx, a).origin, Point::new(0.0, 0.0));
        assert_eq!(rect_of(&ctx, b).origin, Point::new(0.0, 30.0));
        assert_eq!(Axis::Y.cross(), Axis::X);
    }
}
