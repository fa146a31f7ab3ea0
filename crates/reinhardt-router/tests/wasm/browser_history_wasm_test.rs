//! Browser tests for the history bindings and DOM listeners.
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use reinhardt_router::{
	BrowserHistory, History, NAVIGATE, NavigationController, Route, mount,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CustomEvent, CustomEventInit, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn routes() -> Vec<Route<String>> {
	vec![
		Route::view("", "home".to_string()),
		Route::redirect("wasm/old", "wasm/nav"),
		Route::view("wasm/nav", "nav".to_string()),
	]
}

fn controller() -> NavigationController<String, BrowserHistory> {
	let history = BrowserHistory::new().unwrap();
	history.replace("/").unwrap();
	let controller = NavigationController::new(history).unwrap();
	controller.set_routes(routes()).unwrap();
	controller
}

fn document() -> web_sys::Document {
	web_sys::window().unwrap().document().unwrap()
}

#[wasm_bindgen_test]
fn test_push_updates_location() {
	let history = BrowserHistory::new().unwrap();
	history.push("/wasm/pushed").unwrap();

	let href = history.href().unwrap();
	assert!(href.ends_with("/wasm/pushed"));
}

#[wasm_bindgen_test]
fn test_navigate_replaces_redirect_hops() {
	let controller = controller();
	controller.navigate("wasm/old").unwrap();

	assert_eq!(controller.current_render(), Some("nav".to_string()));
	assert!(controller.history().href().unwrap().ends_with("/wasm/nav"));
}

#[wasm_bindgen_test]
fn test_mounted_root_handles_navigate_event() {
	let controller = controller();
	let root = document().create_element("div").unwrap();
	document().body().unwrap().append_child(&root).unwrap();
	let _listeners = mount(&controller, &root).unwrap();

	let init = CustomEventInit::new();
	init.set_detail(&js_sys::JSON::parse(r#"{"go":["wasm","nav"]}"#).unwrap());
	let event = CustomEvent::new_with_event_init_dict(NAVIGATE, &init).unwrap();
	root.dispatch_event(&event).unwrap();

	assert_eq!(controller.current_path_value(), "wasm/nav");
	root.remove();
}

#[wasm_bindgen_test]
fn test_mounted_root_intercepts_link_click() {
	let controller = controller();
	let root = document().create_element("div").unwrap();
	root.set_inner_html(r#"<a href="/wasm/nav"><span id="wasm-link">go</span></a>"#);
	document().body().unwrap().append_child(&root).unwrap();
	let _listeners = mount(&controller, &root).unwrap();

	let span = document()
		.get_element_by_id("wasm-link")
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap();
	span.click();

	assert_eq!(controller.current_render(), Some("nav".to_string()));
	root.remove();
}

#[wasm_bindgen_test]
fn test_dropped_listeners_stop_intercepting() {
	let controller = controller();
	let root = document().create_element("div").unwrap();
	document().body().unwrap().append_child(&root).unwrap();
	drop(mount(&controller, &root).unwrap());

	let init = CustomEventInit::new();
	init.set_detail(&js_sys::JSON::parse(r#"{"go":"wasm/nav"}"#).unwrap());
	let event = CustomEvent::new_with_event_init_dict(NAVIGATE, &init).unwrap();
	root.dispatch_event(&event).unwrap();

	assert_eq!(controller.current_path_value(), "");
	root.remove();
}
