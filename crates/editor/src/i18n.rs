use std::sync::atomic::{AtomicU8, Ordering};

use scene_editor_lib::build::SketchTool;
use scene_editor_lib::scene::ViewMode;
use scene_editor_lib::state::transform::TransformMode;
use shared::ShapeKind;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(1); // 1=En (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        0 => Lang::Ru,
        _ => Lang::En,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.new" => if ru { "Новая сцена" } else { "New scene" },
        "menu.open" => if ru { "Открыть сцену..." } else { "Open Scene..." },
        "menu.open_title" => if ru { "Открыть JSON сцены" } else { "Open Scene JSON" },
        "menu.save" => if ru { "Сохранить сцену..." } else { "Save Scene..." },
        "menu.save_title" => if ru { "Сохранить JSON сцены" } else { "Save Scene JSON" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.edit" => if ru { "Правка" } else { "Edit" },
        "menu.undo" => if ru { "Отменить  Ctrl+Z" } else { "Undo  Ctrl+Z" },
        "menu.redo" => if ru { "Повторить  Ctrl+Shift+Z" } else { "Redo  Ctrl+Shift+Z" },
        "menu.delete" => if ru { "Удалить  Del" } else { "Delete  Del" },
        "menu.deselect" => if ru { "Снять выделение  Esc" } else { "Deselect  Esc" },
        "menu.clear_all" => if ru { "Удалить всё" } else { "Clear all" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.scene_tree" => if ru { "Дерево сцены" } else { "Scene tree" },
        "menu.properties" => if ru { "Свойства" } else { "Properties" },
        "menu.ground_grid" => if ru { "Сетка" } else { "Ground grid" },
        "menu.axes" => if ru { "Оси" } else { "Axes" },
        "menu.reset_camera" => if ru { "Сбросить камеру" } else { "Reset camera" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        "menu.create" => if ru { "Создать" } else { "Create" },
        "menu.primitives" => if ru { "Примитивы" } else { "Primitives" },
        "menu.sketch" => if ru { "Эскиз" } else { "Sketch" },

        // ── Shapes ──────────────────────────────────────────
        "prim.box" => if ru { "Куб" } else { "Box" },
        "prim.sphere" => if ru { "Сфера" } else { "Sphere" },
        "prim.cylinder" => if ru { "Цилиндр" } else { "Cylinder" },
        "prim.cone" => if ru { "Конус" } else { "Cone" },
        "prim.torus" => if ru { "Тор" } else { "Torus" },
        "prim.plane" => if ru { "Плоскость" } else { "Plane" },
        "prim.extruded" => if ru { "Выдавливание" } else { "Extrusion" },
        "tool.rectangle" => if ru { "Прямоугольник" } else { "Rectangle" },
        "tool.circle" => if ru { "Окружность" } else { "Circle" },
        "tool.triangle" => if ru { "Треугольник" } else { "Triangle" },
        "tool.ellipse" => if ru { "Эллипс" } else { "Ellipse" },
        "tool.polygon" => if ru { "Многоугольник" } else { "Polygon" },

        // ── Toolbar ─────────────────────────────────────────
        "tb.primitives" => if ru { "Примитивы" } else { "Primitives" },
        "tb.sketch" => if ru { "Эскиз" } else { "Sketch" },
        "tb.view" => if ru { "Вид" } else { "View" },
        "tb.transform" => if ru { "Трансформация" } else { "Transform" },
        "tb.undo" => if ru { "Отменить" } else { "Undo" },
        "tb.redo" => if ru { "Повторить" } else { "Redo" },
        "view.wireframe" => if ru { "Каркас" } else { "Wireframe" },
        "view.default" => if ru { "Обычный" } else { "Default" },
        "view.realistic" => if ru { "Реалистичный" } else { "Realistic" },
        "mode.translate" => if ru { "Перемещение  G" } else { "Move  G" },
        "mode.rotate" => if ru { "Вращение  R" } else { "Rotate  R" },
        "mode.scale" => if ru { "Масштаб  S" } else { "Scale  S" },

        // ── Sketch toolbar ──────────────────────────────────
        "sk.title" => if ru { "Эскиз:" } else { "Sketch:" },
        "sk.hollow" => if ru { "Полая" } else { "Hollow" },
        "sk.sides" => if ru { "Стороны" } else { "Sides" },
        "sk.snap" => if ru { "Привязка" } else { "Snap" },
        "sk.grid" => if ru { "Шаг сетки" } else { "Grid" },
        "sk.extrude" => if ru { "Выдавить" } else { "Extrude" },
        "sk.depth" => if ru { "Глубина" } else { "Depth" },
        "sk.done" => if ru { "Готово" } else { "Done" },

        // ── Properties ──────────────────────────────────────
        "prop.title" => if ru { "Свойства" } else { "Properties" },
        "prop.select_object" => if ru { "Выберите объект" } else { "Select an object" },
        "prop.to_view" => if ru { "для просмотра свойств" } else { "to view its properties" },
        "prop.kind" => if ru { "Тип" } else { "Kind" },
        "prop.faces" => if ru { "Грани" } else { "Faces" },
        "prop.edges" => if ru { "Рёбра" } else { "Edges" },
        "prop.position" => if ru { "Позиция" } else { "Position" },
        "prop.scale" => if ru { "Масштаб" } else { "Scale" },
        "prop.visible" => if ru { "Видимый" } else { "Visible" },
        "prop.color" => if ru { "Цвет" } else { "Color" },
        "prop.parameters" => if ru { "Параметры" } else { "Parameters" },
        "prop.extrude" => if ru { "Выдавить эскиз" } else { "Extrude sketch" },
        "prop.delete" => if ru { "Удалить" } else { "Delete" },
        "prop.toggle_visible" => if ru { "Показать/скрыть" } else { "Show/hide" },

        // ── Scene tree ──────────────────────────────────────
        "tree.title" => if ru { "Сцена" } else { "Scene" },
        "tree.empty" => if ru { "Сцена пуста" } else { "Scene is empty" },

        // ── Status bar ──────────────────────────────────────
        "status.objects" => if ru { "Объекты" } else { "Objects" },
        "status.selected" => if ru { "Выбран" } else { "Selected" },
        "status.ready" => if ru { "Готово" } else { "Ready" },
        "status.history" => if ru { "История" } else { "History" },
        "hint.sketch_prefix" => if ru { "Эскиз" } else { "Sketch" },
        "hint.press" => if ru { "Нажмите на рабочей плоскости" } else { "Press on the work plane" },
        "hint.release" => if ru { "Отпустите, чтобы создать фигуру" } else { "Release to create the shape" },
        "hint.esc" => if ru { "Esc - выход из эскиза" } else { "Esc to leave sketch" },
        "hint.drag_axis" => if ru { "Тяните ручку оси" } else { "Drag an axis handle" },

        "yes" => if ru { "Да" } else { "Yes" },
        "no" => if ru { "Нет" } else { "No" },

        _ => "???",
    }
}

pub fn shape_name(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Box => t("prim.box"),
        ShapeKind::Sphere => t("prim.sphere"),
        ShapeKind::Cylinder => t("prim.cylinder"),
        ShapeKind::Cone => t("prim.cone"),
        ShapeKind::Torus => t("prim.torus"),
        ShapeKind::Plane => t("prim.plane"),
        ShapeKind::Extruded => t("prim.extruded"),
        ShapeKind::SketchRectangle => t("tool.rectangle"),
        ShapeKind::SketchCircle => t("tool.circle"),
        ShapeKind::SketchTriangle => t("tool.triangle"),
        ShapeKind::SketchEllipse => t("tool.ellipse"),
        ShapeKind::SketchPolygon => t("tool.polygon"),
    }
}

pub fn tool_name(tool: SketchTool) -> &'static str {
    shape_name(tool.shape_kind())
}

pub fn view_mode_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Wireframe => t("view.wireframe"),
        ViewMode::Default => t("view.default"),
        ViewMode::Realistic => t("view.realistic"),
    }
}

pub fn transform_mode_name(mode: TransformMode) -> &'static str {
    match mode {
        TransformMode::Translate => t("mode.translate"),
        TransformMode::Rotate => t("mode.rotate"),
        TransformMode::Scale => t("mode.scale"),
    }
}
