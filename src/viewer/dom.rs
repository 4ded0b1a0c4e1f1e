//! Browser binding: drives a scrollable element whose cells are absolutely
//! positioned `HTMLElement`s.
//!
//! Cell content comes from JavaScript callbacks:
//! - `create(viewType) -> HTMLElement`
//! - `bind(element, id)`
//! - optional `viewType(id) -> number`
//!
//! A `ResizeObserver` on the scroll element is the geometry signal and its
//! `scroll` event is the scroll signal. Listeners are registered when the grid
//! is created and removed when it is dropped. Calls made from inside a cell
//! callback fail with a "busy" error instead of re-entering the grid.

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node, ResizeObserver};

use super::{GridView, SharedView};
use crate::layout::CellFrame;
use crate::render::{CellAdapter, GridContainer, ViewType};
use crate::types::{CellDefinition, GridConfig};

type DomGridView = GridView<String, JsAdapter, DomContainer>;

fn px(value: u32) -> String {
    format!("{value}px")
}

fn scroll_px(value: i32) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(0)
}

/// Content `<div>` inside the scroll element holding placeholders and cells
pub struct DomContainer {
    document: Document,
    scroller: HtmlElement,
    content: HtmlElement,
}

impl DomContainer {
    pub fn new(scroller: HtmlElement) -> Result<Self, JsValue> {
        let document = scroller
            .owner_document()
            .ok_or_else(|| JsValue::from_str("scroll element has no owner document"))?;
        let content: HtmlElement = document.create_element("div")?.dyn_into()?;
        content.style().set_property("position", "relative")?;
        scroller.style().set_property("overflow-y", "auto")?;
        scroller.append_child(&content)?;
        Ok(Self {
            document,
            scroller,
            content,
        })
    }

    fn apply_frame(element: &HtmlElement, frame: &CellFrame) -> Result<(), JsValue> {
        let style = element.style();
        style.set_property("position", "absolute")?;
        style.set_property("box-sizing", "border-box")?;
        style.set_property("left", &px(frame.x))?;
        style.set_property("top", &px(frame.y))?;
        style.set_property("width", &px(frame.width))?;
        style.set_property("height", &px(frame.height))?;
        style.set_property("margin-right", &px(frame.margin_right))?;
        style.set_property("margin-bottom", &px(frame.margin_bottom))?;
        Ok(())
    }
}

impl GridContainer for DomContainer {
    type Instance = HtmlElement;

    fn set_content_size(&mut self, width: u32, height: u32) {
        let style = self.content.style();
        if style.set_property("width", &px(width)).is_err()
            || style.set_property("height", &px(height)).is_err()
        {
            warn!(width, height, "failed to size grid content");
        }
    }

    fn set_scroll_offset(&mut self, offset: u32) {
        self.scroller
            .set_scroll_top(i32::try_from(offset).unwrap_or(i32::MAX));
    }

    fn add_placeholder(&mut self, frame: &CellFrame) {
        let placeholder = self
            .document
            .create_element("div")
            .and_then(|element| element.dyn_into::<HtmlElement>().map_err(JsValue::from));
        let Ok(placeholder) = placeholder else {
            warn!("failed to create placeholder");
            return;
        };
        let attached = Self::apply_frame(&placeholder, frame)
            .and_then(|()| placeholder.style().set_property("visibility", "hidden"))
            .and_then(|()| self.content.append_child(&placeholder).map(|_| ()));
        if attached.is_err() {
            warn!(?frame, "failed to attach placeholder");
        }
    }

    fn place(&mut self, instance: &HtmlElement, frame: &CellFrame) {
        if Self::apply_frame(instance, frame).is_err() {
            warn!(?frame, "failed to position cell");
        }
        let node: &Node = instance;
        if !self.content.contains(Some(node)) && self.content.append_child(node).is_err() {
            warn!(?frame, "failed to attach cell");
        }
    }

    fn remove(&mut self, instance: &HtmlElement) {
        instance.remove();
    }

    fn clear(&mut self) {
        self.content.set_inner_html("");
    }
}

/// Adapter backed by JavaScript callbacks
pub struct JsAdapter {
    create: Function,
    bind: Function,
    view_type: Option<Function>,
    /// Cloned when `create` does not return an element
    template: HtmlElement,
}

impl CellAdapter<String> for JsAdapter {
    type Instance = HtmlElement;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn view_type(&self, id: &String) -> ViewType {
        self.view_type
            .as_ref()
            .and_then(|f| f.call1(&JsValue::NULL, &JsValue::from_str(id)).ok())
            .and_then(|value| value.as_f64())
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map_or(ViewType::DEFAULT, |n| ViewType(n as u32))
    }

    fn create_instance(&mut self, view_type: ViewType) -> HtmlElement {
        match self
            .create
            .call1(&JsValue::NULL, &JsValue::from(view_type.0))
        {
            Ok(value) if value.is_instance_of::<HtmlElement>() => value.unchecked_into(),
            _ => {
                warn!(
                    view_type = view_type.0,
                    "create callback did not return an HTMLElement"
                );
                self.template
                    .clone_node()
                    .map(JsCast::unchecked_into)
                    .unwrap_or_else(|_| self.template.clone())
            }
        }
    }

    fn bind(&mut self, instance: &mut HtmlElement, id: &String) {
        let element: &JsValue = instance;
        if self
            .bind
            .call2(&JsValue::NULL, element, &JsValue::from_str(id))
            .is_err()
        {
            warn!(id = %id, "bind callback threw");
        }
    }
}

/// Virtualized spannable grid attached to a scrollable element
#[wasm_bindgen]
pub struct SpanGrid {
    view: SharedView<DomGridView>,
    scroller: HtmlElement,
    scroll_listener: Closure<dyn FnMut()>,
    resize_observer: ResizeObserver,
    _resize_callback: Closure<dyn FnMut(js_sys::Array)>,
}

#[wasm_bindgen]
impl SpanGrid {
    /// Attach a grid to `scroller`.
    ///
    /// `options` is a `{ columnCount, cellGap, sidePadding, rightToLeft }`
    /// object (any field may be omitted) or `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        scroller: HtmlElement,
        options: JsValue,
        create: Function,
        bind: Function,
        view_type: Option<Function>,
    ) -> Result<SpanGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = if options.is_undefined() || options.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let document = scroller
            .owner_document()
            .ok_or_else(|| JsValue::from_str("scroll element has no owner document"))?;
        let template: HtmlElement = document.create_element("div")?.dyn_into()?;
        let adapter = JsAdapter {
            create,
            bind,
            view_type,
            template,
        };
        let container = DomContainer::new(scroller.clone())?;
        let view = SharedView::new(GridView::new(config, adapter, container)?);

        let weak_view = view.downgrade();
        let scroll_source = scroller.clone();
        let scroll_listener = Closure::wrap(Box::new(move || {
            let Some(view) = weak_view.upgrade() else {
                return;
            };
            match view.write() {
                Ok(mut view) => {
                    view.on_scroll(scroll_px(scroll_source.scroll_top()));
                }
                Err(e) => warn!(error = %e, "scroll event dropped"),
            };
        }) as Box<dyn FnMut()>);
        scroller
            .add_event_listener_with_callback("scroll", scroll_listener.as_ref().unchecked_ref())?;

        let weak_view = view.downgrade();
        let size_source = scroller.clone();
        let resize_callback = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
            let Some(view) = weak_view.upgrade() else {
                return;
            };
            match view.write() {
                Ok(mut view) => {
                    view.on_geometry_ready(
                        scroll_px(size_source.client_width()),
                        scroll_px(size_source.client_height()),
                    );
                }
                Err(e) => warn!(error = %e, "resize event dropped"),
            };
        }) as Box<dyn FnMut(js_sys::Array)>);
        let resize_observer = ResizeObserver::new(resize_callback.as_ref().unchecked_ref())?;
        resize_observer.observe(&scroller);

        Ok(SpanGrid {
            view,
            scroller,
            scroll_listener,
            resize_observer,
            _resize_callback: resize_callback,
        })
    }

    /// Replace the items (`[{ id, rowSpan, colSpan, rowStart?, colStart? }]`)
    #[wasm_bindgen(js_name = setItems)]
    pub fn set_items(&self, items: JsValue) -> Result<(), JsValue> {
        let definitions: Vec<CellDefinition<String>> = serde_wasm_bindgen::from_value(items)?;
        self.view.write()?.set_definitions(definitions)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setColumnCount)]
    pub fn set_column_count(&self, column_count: u32) -> Result<(), JsValue> {
        self.view.write()?.set_column_count(column_count)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = scrollToItem)]
    pub fn scroll_to_item(&self, id: &str) -> Result<(), JsValue> {
        self.view.write()?.scroll_to_item(&id.to_string())?;
        Ok(())
    }

    /// Id of the item under a point in content coordinates
    #[wasm_bindgen(js_name = itemAt)]
    pub fn item_at(&self, x: u32, y: u32) -> Result<Option<String>, JsValue> {
        Ok(self.view.read()?.item_at(x, y).cloned())
    }

    /// Resolved layout as `{ columnCount, rowCount, cells }`
    pub fn layout(&self) -> Result<JsValue, JsValue> {
        let view = self.view.read()?;
        Ok(serde_wasm_bindgen::to_value(view.grid())?)
    }
}

impl Drop for SpanGrid {
    fn drop(&mut self) {
        self.resize_observer.disconnect();
        if self
            .scroller
            .remove_event_listener_with_callback(
                "scroll",
                self.scroll_listener.as_ref().unchecked_ref(),
            )
            .is_err()
        {
            warn!("failed to remove scroll listener");
        }
    }
}
