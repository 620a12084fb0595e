use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;
use trellis::prelude::*;
use trellis::{INJECTOR_CAPABILITIES, TrellisError};

// Captures everything emitted through the `log` facade so tests can assert
// on warnings. Tests share one process-wide logger; assertions search for
// substrings unique to the test.
struct CaptureLogger;

static MESSAGES: Mutex<Vec<String>> = Mutex::new(Vec::new());
static LOGGER: CaptureLogger = CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        MESSAGES.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

fn init_logging() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
}

fn logged(substr: &str) -> bool {
    MESSAGES.lock().unwrap().iter().any(|m| m.contains(substr))
}

/// A component that records every property set it renders with.
fn recording_component(name: &str) -> (Rc<dyn Component>, Rc<RefCell<Vec<Props>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let component: Rc<dyn Component> = Rc::new(ComponentClass::new(name, move |props, _ctx| {
        sink.borrow_mut().push(props.clone());
        Ok(Element::text("ok"))
    }));
    (component, seen)
}

fn mount_with_stores(stores: Stores, element: Element) -> TrellisResult<Mounted> {
    let app = StoreProvider::new(stores).child(element).into_element();
    mount(&app, &Context::new())
}

#[test]
fn named_stores_become_props_in_order() {
    let store_a = prop(String::from("A"));
    let store_b = prop(String::from("B"));
    let stores = Stores::new()
        .with("a", store_a.clone())
        .with("b", store_b.clone());

    let (target, seen) = recording_component("Page");
    let page = inject(("a", "b"))(target);
    let element = Element::component(page, Props::new().with("c", prop(1i32)));

    mount_with_stores(stores, element).unwrap();

    let rendered = seen.borrow();
    assert_eq!(rendered.len(), 1);
    let keys: Vec<&str> = rendered[0].keys().collect();
    assert_eq!(keys, ["c", "a", "b"]);
    assert!(Rc::ptr_eq(rendered[0].get("a").unwrap(), &store_a));
    assert!(Rc::ptr_eq(rendered[0].get("b").unwrap(), &store_b));
}

#[test]
fn explicit_props_win_over_named_stores() {
    let ambient = prop(String::from("ambient"));
    let explicit = prop(String::from("explicit"));
    let stores = Stores::new().with("user", ambient);

    let (target, seen) = recording_component("Profile");
    let profile = inject("user")(target);
    let element = Element::component(profile, Props::new().with("user", explicit.clone()));

    mount_with_stores(stores, element).unwrap();
    assert!(Rc::ptr_eq(seen.borrow()[0].get("user").unwrap(), &explicit));
}

#[test]
fn missing_named_store_fails_the_mount() {
    let (target, seen) = recording_component("Cart");
    let cart = inject("cart")(target);
    let element = Element::component(cart, Props::new());

    let err = mount_with_stores(Stores::new(), element).err().unwrap();
    assert_eq!(err, TrellisError::MissingStore("cart".into()));
    assert_eq!(
        err.to_string(),
        "Store \"cart\" is not available! Did you forget to provide it through a StoreProvider?"
    );
    assert!(seen.borrow().is_empty());
}

#[test]
fn vec_and_array_name_forms_are_equivalent() {
    let stores = Stores::new()
        .with("a", prop(1i32))
        .with("b", prop(2i32));

    let (target, seen) = recording_component("Wide");
    let wide = inject(["a", "b"])(target);
    mount_with_stores(stores.clone(), Element::component(wide, Props::new())).unwrap();
    assert_eq!(seen.borrow()[0].len(), 2);

    let (target, seen) = recording_component("Wide");
    let wide = inject(vec!["a", "b"])(target);
    mount_with_stores(stores, Element::component(wide, Props::new())).unwrap();
    assert_eq!(seen.borrow()[0].len(), 2);
}

#[test]
fn display_names_describe_the_wrapping() {
    let (target, _) = recording_component("Todos");
    let named = inject(("a", "b"))(target);
    assert_eq!(named.display_name(), "inject-Todos-with-a-b");

    let (target, _) = recording_component("Todos");
    let custom = inject(|_: &Stores, _: &Props, _: &Context| -> Option<Props> { None })(target);
    assert_eq!(custom.display_name(), "inject-Todos");

    // No store names, no dangling `-with-` suffix.
    let (target, _) = recording_component("Todos");
    let empty = inject(Vec::<String>::new())(target);
    assert_eq!(empty.display_name(), "inject-Todos");
}

#[test]
fn custom_resolver_output_overwrites_incoming_props() {
    let replacement = prop(String::from("mapped"));
    let mapped = replacement.clone();
    let stores = Stores::new().with("user", prop(String::from("store")));

    let (target, seen) = recording_component("Header");
    let header = inject(move |_: &Stores, _: &Props, _: &Context| -> Option<Props> {
        Some(Props::new().with("user", mapped.clone()))
    })(target);
    let element = Element::component(
        header,
        Props::new().with("user", prop(String::from("incoming"))),
    );

    mount_with_stores(stores, element).unwrap();
    assert!(Rc::ptr_eq(seen.borrow()[0].get("user").unwrap(), &replacement));
}

#[test]
fn custom_resolver_rerenders_when_observed_stores_change() {
    let count = Observable::new(1i32);
    let stores = Stores::new().with("clock", prop(count));

    let (target, seen) = recording_component("Timer");
    let timer = inject(|stores: &Stores, _: &Props, _: &Context| -> Option<Props> {
        let clock = *stores.get_as::<Observable<i32>>("clock")?;
        Some(Props::new().with("seconds", prop(clock.get())))
    })(target);
    assert!(timer.reactive());

    let mounted =
        mount_with_stores(stores, Element::component(timer, Props::new())).unwrap();
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0].get_as::<i32>("seconds"), Some(&1));

    count.set(2);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(seen.borrow()[1].get_as::<i32>("seconds"), Some(&2));

    mounted.dispose();
    count.set(3);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn name_injectors_do_not_track_store_internals() {
    let count = Observable::new(1i32);
    let stores = Stores::new().with("clock", prop(count));

    let (target, seen) = recording_component("Static");
    let fixed = inject("clock")(target);
    assert!(!fixed.reactive());

    let _mounted =
        mount_with_stores(stores, Element::component(fixed, Props::new())).unwrap();
    assert_eq!(seen.borrow().len(), 1);
    count.set(2);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn statics_are_hoisted_minus_reserved_names() {
    let version = prop(3i32);
    let form = ComponentClass::new("Form", |_props, _ctx| Ok(Element::Empty))
        .with_static("version", version.clone())
        .with_static("wrapped_component", prop(String::from("sneaky")))
        .into_component();

    let injector = create_injector(Resolver::names(["session"]), form, Some("session"));
    let statics = injector.statics().unwrap();
    assert!(Rc::ptr_eq(&statics["version"], &version));
    assert!(!statics.contains_key("wrapped_component"));
}

#[test]
fn injectors_share_one_capability_descriptor() {
    let (a, _) = recording_component("A");
    let (b, _) = recording_component("B");
    let a = create_injector(Resolver::names(["s"]), a, None);
    let b = create_injector(Resolver::names(["s"]), b, None);
    assert!(std::ptr::eq(
        a.context_capabilities().unwrap(),
        b.context_capabilities().unwrap()
    ));
    assert!(std::ptr::eq(
        a.context_capabilities().unwrap(),
        &INJECTOR_CAPABILITIES
    ));
    assert_eq!(INJECTOR_CAPABILITIES.keys(), ["stores"]);
}

#[test]
fn replacing_injector_capabilities_is_rejected_with_a_warning() {
    init_logging();
    static OTHER_CAPS: ContextCapabilities = ContextCapabilities::new(&["theme"]);

    let (target, _) = recording_component("Guarded");
    let injector = create_injector(Resolver::names(["s"]), target, Some("s"));
    injector.set_context_capabilities(&OTHER_CAPS);

    assert!(std::ptr::eq(
        injector.context_capabilities().unwrap(),
        &INJECTOR_CAPABILITIES
    ));
    assert!(logged("replace `context_capabilities` on `inject-Guarded-with-s`"));
}

#[test]
fn make_reactive_warns_on_injectors_but_inject_itself_does_not() {
    init_logging();

    let (target, _) = recording_component("ExternallyWrapped");
    let injector: Rc<dyn Component> =
        Rc::new(create_injector(Resolver::names(["s"]), target, None));
    let wrapped = make_reactive(injector);
    assert!(wrapped.reactive());
    assert!(wrapped.is_injector());
    assert!(logged("`inject-ExternallyWrapped` is an injector"));

    let (target, _) = recording_component("InternallyWrapped");
    let custom = inject(|_: &Stores, _: &Props, _: &Context| -> Option<Props> { None })(target);
    assert!(custom.reactive());
    assert!(!logged("`inject-InternallyWrapped` is an injector"));
}

#[test]
fn nested_providers_merge_with_the_nearest_winning() {
    init_logging();
    let outer_session = prop(String::from("outer"));
    let inner_session = prop(String::from("inner"));
    let router = prop(String::from("router"));

    let (target, seen) = recording_component("Deep");
    let deep = inject(("session_x", "router_x"))(target);

    let inner = StoreProvider::new(Stores::new().with("session_x", inner_session.clone()))
        .child(Element::component(deep, Props::new()))
        .into_element();
    let outer = StoreProvider::new(
        Stores::new()
            .with("session_x", outer_session)
            .with("router_x", router.clone()),
    )
    .child(inner)
    .into_element();

    mount(&outer, &Context::new()).unwrap();

    let rendered = seen.borrow();
    assert!(Rc::ptr_eq(rendered[0].get("session_x").unwrap(), &inner_session));
    assert!(Rc::ptr_eq(rendered[0].get("router_x").unwrap(), &router));
    assert!(logged("store `session_x` is already provided by an ancestor"));
}

#[test]
fn custom_resolver_sees_empty_stores_without_a_provider() {
    let (target, seen) = recording_component("Orphan");
    let orphan = inject(|stores: &Stores, _: &Props, _: &Context| -> Option<Props> {
        assert!(stores.is_empty());
        None
    })(target);

    let element = Element::component(orphan, Props::new().with("n", prop(1i32)));
    mount(&element, &Context::new()).unwrap();
    assert_eq!(seen.borrow()[0].len(), 1);
}

#[test]
fn injector_renders_are_idempotent() {
    let store = prop(String::from("S"));
    let ctx = Context::new().with_stores(Stores::new().with("s", store));
    let props = Props::new().with("n", prop(1i32));

    let (target, _) = recording_component("Stable");
    let injector = create_injector(Resolver::names(["s"]), target, Some("s"));

    let first = injector.render(&props, &ctx).unwrap();
    let second = injector.render(&props, &ctx).unwrap();
    assert_eq!(
        first.as_component().unwrap().props,
        second.as_component().unwrap().props
    );
    assert_eq!(props.len(), 1);
}

#[test]
fn wrapped_component_and_instance_are_reachable() {
    let stores = Stores::new().with("s", prop(String::from("S")));
    let (target, _) = recording_component("Inner");
    let wrapped = inject("s")(target.clone());

    assert!(Rc::ptr_eq(wrapped.wrapped_component().unwrap(), &target));
    assert!(wrapped.wrapped_instance().is_none());

    mount_with_stores(stores, Element::component(wrapped.clone(), Props::new())).unwrap();

    let instance = wrapped.wrapped_instance().unwrap();
    assert_eq!(instance.component.display_name(), "Inner");
    assert!(instance.props.contains("s"));
}

#[test]
fn custom_shape_exposes_the_same_surface() {
    let (target, _) = recording_component("Mapped");
    let wrapped = inject(|_: &Stores, _: &Props, _: &Context| -> Option<Props> { None })(
        target.clone(),
    );

    assert!(wrapped.is_injector());
    assert!(Rc::ptr_eq(wrapped.wrapped_component().unwrap(), &target));
    assert!(wrapped.wrapped_instance().is_none());

    mount(
        &Element::component(wrapped.clone(), Props::new()),
        &Context::new(),
    )
    .unwrap();
    assert_eq!(
        wrapped.wrapped_instance().unwrap().component.display_name(),
        "Mapped"
    );
}

#[test]
fn target_render_errors_pass_through_the_injector() {
    let broken = ComponentClass::new("Broken", |_props, _ctx| {
        Err(TrellisError::Render("boom".into()))
    })
    .into_component();
    let wrapped = inject("s")(broken);

    let stores = Stores::new().with("s", prop(1i32));
    let err = mount_with_stores(stores, Element::component(wrapped, Props::new()))
        .err()
        .unwrap();
    assert_eq!(err, TrellisError::Render("boom".into()));
}
