use egui::{PointerButton, Pos2, Rect, Vec2};
use roi_dashboard::command::Command;
use roi_dashboard::geometry::RectRoi;
use roi_dashboard::input::{InputHandler, PointerSnapshot};
use roi_dashboard::tools::{RectangleDragState, RectangleRoiTool, RoiTool, RECTANGLE_SURFACE_SIZE};

fn run(input: &mut InputHandler, tool: &mut RectangleRoiTool, frames: &[PointerSnapshot]) -> Vec<Command> {
    let mut commands = Vec::new();
    for pointer in frames {
        for event in input.process_pointer(pointer) {
            commands.extend(tool.handle_event(&event));
        }
    }
    commands
}

fn at(origin: Pos2, x: f32, y: f32) -> Option<Pos2> {
    Some(origin + Vec2::new(x, y))
}

fn drag_frames(origin: Pos2, from: (f32, f32), to: (f32, f32)) -> Vec<PointerSnapshot> {
    vec![
        PointerSnapshot {
            hover_pos: at(origin, from.0, from.1),
            ..Default::default()
        },
        PointerSnapshot {
            hover_pos: at(origin, from.0, from.1),
            pressed: vec![PointerButton::Primary],
            down: vec![PointerButton::Primary],
            ..Default::default()
        },
        PointerSnapshot {
            hover_pos: at(origin, to.0, to.1),
            down: vec![PointerButton::Primary],
            ..Default::default()
        },
        PointerSnapshot {
            hover_pos: at(origin, to.0, to.1),
            released: vec![PointerButton::Primary],
            ..Default::default()
        },
    ]
}

#[test]
fn test_drag_submits_normalized_rectangle() {
    let origin = Pos2::new(40.0, 120.0);
    let mut input = InputHandler::new(Rect::from_min_size(origin, RECTANGLE_SURFACE_SIZE));
    let mut tool = RectangleRoiTool::new("B");

    let commands = run(&mut input, &mut tool, &drag_frames(origin, (50.0, 60.0), (20.0, 10.0)));
    assert_eq!(
        commands,
        vec![Command::SetRoi {
            camera_id: "B".into(),
            roi: RectRoi { x: 20, y: 10, width: 30, height: 50 },
        }]
    );
    assert_eq!(tool.committed(), Some(RectRoi { x: 20, y: 10, width: 30, height: 50 }));
}

#[test]
fn test_scrolled_surface_keeps_local_coordinates() {
    let mut input = InputHandler::new(Rect::from_min_size(Pos2::new(40.0, 120.0), RECTANGLE_SURFACE_SIZE));
    let mut tool = RectangleRoiTool::new("A");

    // The card scrolled up by 100 points since the last frame
    let origin = Pos2::new(40.0, 20.0);
    input.set_surface_rect(Rect::from_min_size(origin, RECTANGLE_SURFACE_SIZE));
    let commands = run(&mut input, &mut tool, &drag_frames(origin, (10.0, 10.0), (110.0, 60.0)));

    let Some(Command::SetRoi { roi, .. }) = commands.first() else {
        panic!("expected a SetRoi command");
    };
    assert_eq!(*roi, RectRoi { x: 10, y: 10, width: 100, height: 50 });
}

#[test]
fn test_leaving_surface_abandons_drag() {
    let origin = Pos2::ZERO;
    let mut input = InputHandler::new(Rect::from_min_size(origin, RECTANGLE_SURFACE_SIZE));
    let mut tool = RectangleRoiTool::new("A");

    let frames = vec![
        PointerSnapshot {
            hover_pos: at(origin, 100.0, 100.0),
            pressed: vec![PointerButton::Primary],
            down: vec![PointerButton::Primary],
            ..Default::default()
        },
        PointerSnapshot {
            hover_pos: at(origin, 200.0, 200.0),
            down: vec![PointerButton::Primary],
            ..Default::default()
        },
        PointerSnapshot {
            hover_pos: at(origin, 400.0, 200.0),
            down: vec![PointerButton::Primary],
            ..Default::default()
        },
        PointerSnapshot {
            hover_pos: at(origin, 400.0, 200.0),
            released: vec![PointerButton::Primary],
            ..Default::default()
        },
    ];
    assert!(run(&mut input, &mut tool, &frames).is_empty());
    assert_eq!(tool.state(), RectangleDragState::Idle);
    assert!(tool.visible_rect().is_none());
}

#[test]
fn test_one_move_per_frame() {
    let origin = Pos2::ZERO;
    let mut input = InputHandler::new(Rect::from_min_size(origin, RECTANGLE_SURFACE_SIZE));
    let events = input.process_pointer(&PointerSnapshot {
        hover_pos: at(origin, 5.0, 5.0),
        ..Default::default()
    });
    let moves = events
        .iter()
        .filter(|event| matches!(event, roi_dashboard::InputEvent::PointerMove { .. }))
        .count();
    assert_eq!(moves, 1);
}
