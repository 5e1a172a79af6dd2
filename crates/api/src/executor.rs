//! Command and query execution against a board canvas.
//!
//! This module connects the abstract Command/Query types to the canvas and
//! its [`BoardStore`], executing operations and returning results.

use crate::{
    Command, CommandResult, ElementInfo, GraphEdge, GraphNode, Query, QueryResult, Target,
};
use canvas::{z_order, Canvas, ElementStore, Gesture, Layer};
use node::{
    CanvasPoint, CanvasSize, ElementDraft, ElementId, ElementKind, ElementRecord, ElementRef,
    RecordPatch,
};
use project::BoardStore;
use scene_graph::SceneNodeId;

/// Execute a command against a canvas.
pub fn execute_command<L: Layer>(
    canvas: &mut Canvas<BoardStore, L>,
    command: Command,
) -> CommandResult {
    log::debug!("executing {command:?}");
    match command {
        Command::CreateTask {
            position,
            title,
            size,
            parent,
        } => create(canvas, ElementKind::Task, position, title, size, parent),

        Command::CreateNote {
            position,
            title,
            size,
            parent,
        } => create(canvas, ElementKind::Note, position, title, size, parent),

        Command::Click { target } => {
            let (element, node) = match resolve_handle(canvas, &target) {
                Ok(found) => found,
                Err(message) => return CommandResult::error(message),
            };
            canvas.dispatch(node, Gesture::Click);
            CommandResult::modified(vec![element.id])
        }

        Command::Drag { target, to } => {
            let (element, node) = match resolve_handle(canvas, &target) {
                Ok(found) => found,
                Err(message) => return CommandResult::error(message),
            };
            canvas.post(node, Gesture::DragStart);
            canvas.post(node, Gesture::DragMove(to));
            canvas.post(node, Gesture::DragEnd);
            canvas.run_pending();
            CommandResult::modified(vec![element.id])
        }

        Command::SetPosition { target, position } => {
            let element = match resolve_target(canvas, &target) {
                Ok(element) => element,
                Err(message) => return CommandResult::error(message),
            };
            if !canvas.update_position(element.id, position.x(), position.y()) {
                return CommandResult::success();
            }
            let patch = RecordPatch {
                x: Some(position.x()),
                y: Some(position.y()),
                ..RecordPatch::default()
            };
            match canvas.store_mut().update(element.kind, element.id, patch) {
                Ok(()) => CommandResult::modified(vec![element.id]),
                Err(err) => CommandResult::error(err.to_string()),
            }
        }

        Command::Update { target, patch } => {
            let element = match resolve_target(canvas, &target) {
                Ok(element) => element,
                Err(message) => return CommandResult::error(message),
            };
            if patch.is_empty() {
                return CommandResult::success();
            }
            let restyle = patch.title.is_some() || patch.width.is_some() || patch.height.is_some();
            if let Err(err) = canvas.store_mut().update(element.kind, element.id, patch) {
                return CommandResult::error(err.to_string());
            }
            if restyle {
                // Shapes are built once; rebuild the visual to pick up the new label or size.
                canvas.remove(element.id);
            }
            canvas.sync();
            CommandResult::modified(vec![element.id])
        }

        Command::Delete { target } => {
            let element = match resolve_target(canvas, &target) {
                Ok(element) => element,
                Err(message) => return CommandResult::error(message),
            };
            if let Err(err) = canvas.store_mut().delete(element.kind, element.id) {
                return CommandResult::error(err.to_string());
            }
            canvas.sync();
            CommandResult::deleted(vec![element.id])
        }

        Command::Link {
            source,
            target,
            link_type,
        } => {
            let ends = resolve_target(canvas, &source)
                .and_then(|source| Ok((source, resolve_target(canvas, &target)?)));
            let (source, target) = match ends {
                Ok(ends) => ends,
                Err(message) => return CommandResult::error(message),
            };
            match canvas.store_mut().link(source, target, link_type) {
                Ok(link) => CommandResult::created(vec![link]),
                Err(err) => CommandResult::error(err.to_string()),
            }
        }

        Command::Batch { commands } => {
            let mut result = CommandResult::success();
            for command in commands {
                result = result.merge(execute_command(canvas, command));
                if result.is_error() {
                    break;
                }
            }
            result
        }
    }
}

fn create<L: Layer>(
    canvas: &mut Canvas<BoardStore, L>,
    kind: ElementKind,
    position: CanvasPoint,
    title: Option<String>,
    size: Option<CanvasSize>,
    parent: Option<ElementId>,
) -> CommandResult {
    if let Some(parent) = parent {
        if canvas.store().lookup(parent).is_none() {
            return CommandResult::error(format!("No element with id {}", parent));
        }
    }
    let draft = ElementDraft {
        x: position.x(),
        y: position.y(),
        width: size.map(|size| size.width()),
        height: size.map(|size| size.height()),
        title,
        z_index: None,
        parent,
    };
    let id = canvas.store_mut().create(kind, draft);
    canvas.sync();
    CommandResult::created(vec![id])
}

/// Execute a query against a canvas.
pub fn execute_query<L: Layer>(canvas: &Canvas<BoardStore, L>, query: Query) -> QueryResult {
    match query {
        Query::Sorted => QueryResult::Elements {
            elements: z_order::sorted_elements(canvas.store())
                .into_iter()
                .map(|(kind, record)| element_info(canvas, kind, record))
                .collect(),
        },

        Query::Selection => QueryResult::Selection {
            element: canvas.selected(),
        },

        Query::MaxZIndex => QueryResult::ZIndex {
            z_index: z_order::max_z_index(canvas.store()),
        },

        Query::Element { target } => {
            let found = resolve_target(canvas, &target).and_then(|element| {
                canvas
                    .store()
                    .get(element)
                    .map(|record| element_info(canvas, element.kind, record))
                    .ok_or_else(|| format!("No {} with id {}", element.kind, element.id))
            });
            match found {
                Ok(element) => QueryResult::Element { element },
                Err(message) => QueryResult::Error { message },
            }
        }

        Query::Search { text } => {
            let needle = text.to_lowercase();
            let store = canvas.store();
            let tasks = store.tasks().iter().map(|record| (ElementKind::Task, record));
            let notes = store.notes().iter().map(|record| (ElementKind::Note, record));
            QueryResult::Elements {
                elements: tasks
                    .chain(notes)
                    .filter(|(_, record)| {
                        record
                            .title
                            .as_deref()
                            .is_some_and(|title| title.to_lowercase().contains(&needle))
                    })
                    .map(|(kind, record)| element_info(canvas, kind, record))
                    .collect(),
            }
        }

        Query::Graph => {
            let store = canvas.store();
            let tasks = store.tasks().iter().map(|record| (ElementKind::Task, record));
            let notes = store.notes().iter().map(|record| (ElementKind::Note, record));
            QueryResult::Graph {
                nodes: tasks
                    .chain(notes)
                    .map(|(kind, record)| GraphNode {
                        id: record.id,
                        kind,
                        label: record.display_title().to_string(),
                        position: record.position(),
                    })
                    .collect(),
                edges: store
                    .links()
                    .iter()
                    .map(|link| GraphEdge {
                        id: link.id,
                        source: link.source,
                        target: link.target,
                        link_type: link.link_type,
                    })
                    .collect(),
            }
        }
    }
}

fn resolve_target<L: Layer>(
    canvas: &Canvas<BoardStore, L>,
    target: &Target,
) -> Result<ElementRef, String> {
    match target {
        Target::Selection => canvas
            .store()
            .selected_element()
            .ok_or_else(|| "Nothing is selected".to_string()),
        Target::Element(prefix) => canvas.store().resolve(prefix).map_err(|err| err.to_string()),
    }
}

fn resolve_handle<L: Layer>(
    canvas: &Canvas<BoardStore, L>,
    target: &Target,
) -> Result<(ElementRef, SceneNodeId), String> {
    let element = resolve_target(canvas, target)?;
    let node = canvas
        .handle_of(element.id)
        .ok_or_else(|| format!("{} {} is not on the canvas", element.kind, element.id))?;
    Ok((element, node))
}

/// Convert a record to ElementInfo for query results.
fn element_info<L: Layer>(
    canvas: &Canvas<BoardStore, L>,
    kind: ElementKind,
    record: &ElementRecord,
) -> ElementInfo {
    let style = canvas.theme().style(kind);
    ElementInfo {
        id: record.id,
        kind,
        position: record.position(),
        size: record.size_or(style.default_size),
        title: record.display_title().to_string(),
        z_index: record.z_order(),
        parent: record.parent,
        selected: canvas.selected() == Some(ElementRef::new(kind, record.id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::RedrawCounter;
    use theme::Theme;

    fn board() -> Canvas<BoardStore, RedrawCounter> {
        Canvas::new(BoardStore::new(), RedrawCounter::new(), Theme::default())
    }

    fn created_id(result: CommandResult) -> ElementId {
        match result {
            CommandResult::Success { created, .. } => created[0],
            CommandResult::Error { message } => panic!("command failed: {message}"),
        }
    }

    fn create_task(canvas: &mut Canvas<BoardStore, RedrawCounter>, x: f32, y: f32) -> ElementId {
        created_id(execute_command(
            canvas,
            Command::CreateTask {
                position: CanvasPoint::new(x, y),
                title: None,
                size: None,
                parent: None,
            },
        ))
    }

    #[test]
    fn test_create_builds_visual() {
        let mut canvas = board();
        let id = create_task(&mut canvas, 10.0, 20.0);
        assert!(canvas.handle_of(id).is_some());

        let QueryResult::Element { element } = execute_query(
            &canvas,
            Query::Element {
                target: Target::from(id),
            },
        ) else {
            panic!("Expected element");
        };
        assert_eq!(element.size, CanvasSize::new(300.0, 200.0));
        assert_eq!(element.title, "Untitled");
        assert_eq!(element.z_index, 1);
    }

    #[test]
    fn test_drag_by_prefix() {
        let mut canvas = board();
        let a = create_task(&mut canvas, 0.0, 0.0);
        create_task(&mut canvas, 300.0, 0.0);
        let prefix = a.to_uuid_string()[..8].to_string();

        let result = execute_command(
            &mut canvas,
            Command::Drag {
                target: Target::element(prefix),
                to: CanvasPoint::new(50.0, 80.0),
            },
        );
        assert_eq!(result, CommandResult::modified(vec![a]));

        let record = canvas.store().get(ElementRef::task(a)).unwrap();
        assert_eq!(record.position(), CanvasPoint::new(50.0, 80.0));
        assert_eq!(
            execute_query(&canvas, Query::MaxZIndex),
            QueryResult::ZIndex { z_index: 4 }
        );
        assert_eq!(
            execute_query(&canvas, Query::Selection),
            QueryResult::Selection {
                element: Some(ElementRef::task(a))
            }
        );
    }

    #[test]
    fn test_selection_target_requires_selection() {
        let mut canvas = board();
        create_task(&mut canvas, 0.0, 0.0);
        let result = execute_command(
            &mut canvas,
            Command::Delete {
                target: Target::Selection,
            },
        );
        assert_eq!(result, CommandResult::error("Nothing is selected"));
    }

    #[test]
    fn test_set_position_is_skipped_when_unchanged() {
        let mut canvas = board();
        let id = create_task(&mut canvas, 5.0, 5.0);
        canvas.store_mut().take_pending();

        let unchanged = execute_command(
            &mut canvas,
            Command::SetPosition {
                target: Target::from(id),
                position: CanvasPoint::new(5.0, 5.0),
            },
        );
        assert_eq!(unchanged, CommandResult::success());
        assert!(!canvas.store().is_dirty());

        let moved = execute_command(
            &mut canvas,
            Command::SetPosition {
                target: Target::from(id),
                position: CanvasPoint::new(9.0, 9.0),
            },
        );
        assert_eq!(moved, CommandResult::modified(vec![id]));
        let node = canvas.handle_of(id).unwrap();
        assert_eq!(canvas.scene().position(node), Some(CanvasPoint::new(9.0, 9.0)));
        assert!(canvas.store().is_dirty());
    }

    #[test]
    fn test_update_rebuilds_label() {
        let mut canvas = board();
        let id = create_task(&mut canvas, 0.0, 0.0);
        execute_command(&mut canvas, Command::Click { target: id.into() });

        let patch = RecordPatch {
            title: Some("Ship it".into()),
            ..RecordPatch::default()
        };
        let result = execute_command(
            &mut canvas,
            Command::Update {
                target: Target::Selection,
                patch,
            },
        );
        assert_eq!(result, CommandResult::modified(vec![id]));

        let node = canvas.handle_of(id).unwrap();
        let shapes = canvas.scene().get_node(node).unwrap().shapes();
        assert_eq!(shapes[1].as_text().unwrap().text, "Ship it");
        // Selection styling is reapplied to the rebuilt visual.
        assert!(canvas.element(id).unwrap().is_highlighted());
    }

    #[test]
    fn test_z_only_update_restacks() {
        let mut canvas = board();
        let a = create_task(&mut canvas, 0.0, 0.0);
        let b = create_task(&mut canvas, 10.0, 0.0);
        assert_eq!(canvas.paint_order(), vec![a, b]);

        let result = execute_command(
            &mut canvas,
            Command::Update {
                target: a.into(),
                patch: RecordPatch {
                    z_index: Some(10),
                    ..RecordPatch::default()
                },
            },
        );
        assert_eq!(result, CommandResult::modified(vec![a]));
        assert_eq!(canvas.paint_order(), vec![b, a]);
    }

    #[test]
    fn test_retitle_keeps_stacking() {
        let mut canvas = board();
        let back = create_task(&mut canvas, 0.0, 0.0);
        let front = create_task(&mut canvas, 10.0, 0.0);

        execute_command(
            &mut canvas,
            Command::Update {
                target: back.into(),
                patch: RecordPatch {
                    title: Some("Renamed".into()),
                    ..RecordPatch::default()
                },
            },
        );
        assert_eq!(canvas.paint_order(), vec![back, front]);
    }

    #[test]
    fn test_search_matches_titles_ignoring_case() {
        let mut canvas = board();
        for (title, note) in [("Buy MILK", false), ("milkshake", true), ("Ship", false)] {
            let position = CanvasPoint::ORIGIN;
            let title = Some(title.to_string());
            let command = if note {
                Command::CreateNote {
                    position,
                    title,
                    size: None,
                    parent: None,
                }
            } else {
                Command::CreateTask {
                    position,
                    title,
                    size: None,
                    parent: None,
                }
            };
            execute_command(&mut canvas, command);
        }
        create_task(&mut canvas, 0.0, 0.0);

        let QueryResult::Elements { elements } = execute_query(
            &canvas,
            Query::Search {
                text: "Milk".into(),
            },
        ) else {
            panic!("Expected elements");
        };
        let titles: Vec<_> = elements.iter().map(|element| element.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy MILK", "milkshake"]);
        assert_eq!(elements[1].kind, ElementKind::Note);
    }

    #[test]
    fn test_graph_lists_elements_and_links() {
        let mut canvas = board();
        let a = create_task(&mut canvas, 0.0, 0.0);
        let b = create_task(&mut canvas, 0.0, 300.0);
        execute_command(
            &mut canvas,
            Command::Link {
                source: a.into(),
                target: b.into(),
                link_type: node::LinkType::DependsOn,
            },
        );

        let QueryResult::Graph { nodes, edges } = execute_query(&canvas, Query::Graph) else {
            panic!("Expected graph");
        };
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].id, b);
        assert_eq!(nodes[1].label, "Untitled");
        assert_eq!(nodes[1].position, CanvasPoint::new(0.0, 300.0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, ElementRef::task(a));
        assert_eq!(edges[0].target, ElementRef::task(b));
        assert_eq!(edges[0].link_type, node::LinkType::DependsOn);
    }

    #[test]
    fn test_delete_and_link() {
        let mut canvas = board();
        let a = create_task(&mut canvas, 0.0, 0.0);
        let b = create_task(&mut canvas, 0.0, 300.0);

        let linked = execute_command(
            &mut canvas,
            Command::Link {
                source: a.into(),
                target: b.into(),
                link_type: node::LinkType::Blocks,
            },
        );
        assert!(!linked.is_error());
        assert_eq!(canvas.store().links().len(), 1);

        let result = execute_command(&mut canvas, Command::Delete { target: b.into() });
        assert_eq!(result, CommandResult::deleted(vec![b]));
        assert!(canvas.handle_of(b).is_none());
        assert!(canvas.store().links().is_empty());

        let QueryResult::Elements { elements } = execute_query(&canvas, Query::Sorted) else {
            panic!("Expected elements");
        };
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id, a);
    }

    #[test]
    fn test_batch_stops_at_first_error() {
        let mut canvas = board();
        let result = execute_command(
            &mut canvas,
            Command::Batch {
                commands: vec![
                    Command::CreateNote {
                        position: CanvasPoint::ORIGIN,
                        title: Some("first".into()),
                        size: None,
                        parent: None,
                    },
                    Command::Click {
                        target: Target::element("zzzz"),
                    },
                    Command::CreateNote {
                        position: CanvasPoint::ORIGIN,
                        title: Some("never".into()),
                        size: None,
                        parent: None,
                    },
                ],
            },
        );
        assert!(result.is_error());
        assert_eq!(canvas.store().notes().len(), 1);
    }

    #[test]
    fn test_create_with_unknown_parent_fails() {
        let mut canvas = board();
        let result = execute_command(
            &mut canvas,
            Command::CreateNote {
                position: CanvasPoint::ORIGIN,
                title: None,
                size: None,
                parent: Some(ElementId::from_u128(77)),
            },
        );
        assert!(result.is_error());
        assert!(canvas.store().notes().is_empty());
    }
}
