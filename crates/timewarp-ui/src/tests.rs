#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use timewarp_core::{Element, InvalidChildError, Node, NodeRef, Primitive, Props, commit, format};
    use timewarp_store::{MemoryStorage, Store};
    use web_time::Instant;

    use crate::components::{self, SlotProps};
    use crate::primitives::{self, ButtonProps, Variant};
    use crate::*;

    #[derive(Default)]
    struct FakeClock {
        now: Cell<i64>,
        travel: Cell<Option<(i64, Mode)>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeClock {
        fn at(now: i64) -> Rc<Self> {
            let c = FakeClock::default();
            c.now.set(now);
            Rc::new(c)
        }
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl TimeControl for FakeClock {
        fn travel(&self, timestamp: i64, mode: Mode) {
            self.travel.set(Some((timestamp, mode)));
            self.now.set(timestamp);
            self.calls.borrow_mut().push(format!("travel:{timestamp}:{mode}"));
        }
        fn return_to_present(&self) {
            self.travel.set(None);
            self.calls.borrow_mut().push("return".into());
        }
        fn is_active(&self) -> bool {
            self.travel.get().is_some()
        }
        fn mode(&self) -> Option<Mode> {
            self.travel.get().map(|(_, m)| m)
        }
        fn now(&self) -> i64 {
            self.now.get()
        }
        fn save(&self, key: &str) {
            self.calls.borrow_mut().push(format!("save:{key}"));
        }
        fn restore(&self, key: &str) {
            self.calls.borrow_mut().push(format!("restore:{key}"));
        }
    }

    const NOW: i64 = 1_700_000_000_000;
    const TARGET: &str = "2030-12-24 18:00";

    fn mount(config: TimeMachineConfig) -> (TimeMachine, Rc<FakeClock>, Store) {
        let clock = FakeClock::at(NOW);
        let store = Store::new(MemoryStorage::shared(), "");
        let tm = TimeMachine::mount(config, clock.clone(), store.clone());
        (tm, clock, store)
    }

    fn target() -> i64 {
        format::parse(TARGET, format::DEFAULT_PATTERN).expect("target parses")
    }

    fn travel_frozen(tm: &TimeMachine) {
        tm.set_input_time(TARGET);
        tm.set_mode(Mode::Frozen);
        assert!(tm.activate());
    }

    fn by_class<'a>(root: &'a Element, class: &str) -> &'a Element {
        root.find_by_class(class)
            .unwrap_or_else(|| panic!("no element with class {class}"))
    }

    #[test]
    fn test_mount_restores_once() {
        let (tm, clock, _) = mount(TimeMachineConfig::new().storage_key("tm"));
        assert_eq!(clock.calls(), vec!["restore:tm".to_string()]);

        let s = tm.state();
        assert!(!s.active);
        assert!(!s.expanded);
        assert_eq!(s.display_time, NOW);
        assert_eq!(s.active_tab, CORE_TAB);

        tm.tick();
        tm.toggle_expand();
        assert_eq!(clock.calls(), vec!["restore:tm".to_string()]);
    }

    #[test]
    fn test_mount_picks_up_restored_travel() {
        let clock = FakeClock::at(NOW);
        clock.travel.set(Some((NOW, Mode::Frozen)));
        let tm = TimeMachine::mount(
            TimeMachineConfig::new(),
            clock.clone(),
            Store::new(MemoryStorage::shared(), ""),
        );
        assert!(tm.state().active);
    }

    #[test]
    fn test_toggle_expand_prefills_input() {
        let (tm, clock, _) = mount(TimeMachineConfig::new());
        clock.travel.set(Some((NOW, Mode::Frozen)));

        tm.toggle_expand();
        let s = tm.state();
        assert!(s.expanded);
        assert_eq!(s.input_time, format::format(NOW, format::DEFAULT_PATTERN));
        assert_eq!(s.mode, Mode::Frozen);

        tm.set_input_time("edited");
        tm.toggle_expand();
        let s = tm.state();
        assert!(!s.expanded);
        assert_eq!(s.input_time, "edited");
    }

    #[test]
    fn test_activate_travels_and_notifies() {
        let seen = Rc::new(RefCell::new(vec![]));
        let config = TimeMachineConfig::new()
            .on_travel({
                let seen = seen.clone();
                move |ts, mode| seen.borrow_mut().push(("config", ts, mode))
            })
            .plugin(Plugin::new("headless").on_travel({
                let seen = seen.clone();
                move |ts, mode| seen.borrow_mut().push(("plugin", ts, mode))
            }));
        let (tm, clock, _) = mount(config);

        travel_frozen(&tm);

        let t = target();
        assert_eq!(clock.travel.get(), Some((t, Mode::Frozen)));
        assert_eq!(
            clock.calls()[1..],
            [format!("travel:{t}:frozen"), "save:__timeMachine__".to_string()]
        );
        let s = tm.state();
        assert!(s.active);
        assert_eq!(s.display_time, t);
        assert_eq!(
            *seen.borrow(),
            vec![("config", t, Mode::Frozen), ("plugin", t, Mode::Frozen)]
        );
    }

    #[test]
    fn test_activate_rejects_bad_input() {
        let fired = Rc::new(Cell::new(false));
        let (tm, clock, _) = mount(TimeMachineConfig::new().on_travel({
            let fired = fired.clone();
            move |_, _| fired.set(true)
        }));
        tm.set_input_time("next tuesday");
        let before = tm.state();

        assert!(!tm.activate());
        assert_eq!(tm.state(), before);
        assert_eq!(clock.travel.get(), None);
        assert_eq!(clock.calls().len(), 1);
        assert!(!fired.get());
    }

    #[test]
    fn test_activate_uses_configured_format() {
        let (tm, clock, _) = mount(TimeMachineConfig::new().date_format("dd/MM/yyyy"));
        tm.set_input_time("24/12/2030");
        assert!(tm.activate());
        assert_eq!(
            clock.travel.get().map(|(ts, _)| ts),
            format::parse("2030-12-24", "yyyy-MM-dd")
        );

        tm.set_input_time(TARGET);
        assert!(!tm.activate());
    }

    #[test]
    fn test_reset_returns_and_clears_storage() {
        let returned = Rc::new(Cell::new(0));
        let config = TimeMachineConfig::new()
            .on_return_to_present({
                let returned = returned.clone();
                move || returned.set(returned.get() + 1)
            })
            .plugin(Plugin::new("p").on_return_to_present({
                let returned = returned.clone();
                move || returned.set(returned.get() + 10)
            }));
        let (tm, clock, store) = mount(config);
        travel_frozen(&tm);
        store.set(DEFAULT_STORAGE_KEY, &serde_json::json!({ "offset": 5 }));
        store.set("unrelated", &1);

        tm.reset();

        assert!(!tm.state().active);
        assert!(!clock.is_active());
        assert_eq!(store.get::<serde_json::Value>(DEFAULT_STORAGE_KEY), None);
        assert_eq!(store.get::<i32>("unrelated"), Some(1));
        assert_eq!(returned.get(), 11);
    }

    #[test]
    fn test_reset_clears_bare_key_with_prefixed_store() {
        let backend = MemoryStorage::shared();
        let raw = Store::new(backend.clone(), "");
        let app = Store::new(backend, "app");
        let tm = TimeMachine::mount(TimeMachineConfig::new(), FakeClock::at(NOW), app.clone());
        travel_frozen(&tm);
        raw.set(DEFAULT_STORAGE_KEY, &1);
        app.set(DEFAULT_STORAGE_KEY, &2);

        tm.reset();

        assert_eq!(raw.get::<i32>(DEFAULT_STORAGE_KEY), None);
        assert_eq!(app.get::<i32>(DEFAULT_STORAGE_KEY), Some(2));
    }

    #[test]
    fn test_subscriber_may_drive_the_widget() {
        let (tm, _, _) = mount(TimeMachineConfig::new());
        let collapse = tm.context().toggle_expand;
        tm.signal().subscribe(move |s: &WidgetState| {
            if s.expanded {
                collapse();
            }
        });

        tm.toggle_expand();
        assert!(!tm.state().expanded);
        assert_eq!(tm.state().input_time, format::format(NOW, format::DEFAULT_PATTERN));
    }

    #[test]
    fn test_tick_refreshes_and_ticks_plugins_while_active() {
        let ticks = Rc::new(RefCell::new(vec![]));
        let (tm, clock, _) = mount(TimeMachineConfig::new().plugin(Plugin::new("p").on_tick({
            let ticks = ticks.clone();
            move |ts| ticks.borrow_mut().push(ts)
        })));

        clock.now.set(NOW + 1_000);
        tm.tick();
        assert_eq!(tm.state().display_time, NOW + 1_000);
        assert!(ticks.borrow().is_empty());

        // The clock was sent elsewhere behind the widget's back.
        clock.travel.set(Some((NOW + 5_000, Mode::Flowing)));
        clock.now.set(NOW + 5_000);
        tm.tick();
        assert!(tm.state().active);
        assert_eq!(*ticks.borrow(), vec![NOW + 5_000]);
    }

    #[test]
    fn test_poll_ticks_once_per_interval() {
        let (tm, clock, _) = mount(TimeMachineConfig::new());
        let t0 = Instant::now();

        assert!(!tm.poll(t0));
        clock.now.set(NOW + 42);
        assert!(!tm.poll(t0 + Duration::from_millis(500)));
        assert_eq!(tm.state().display_time, NOW);

        assert!(tm.poll(t0 + TICK_INTERVAL));
        assert_eq!(tm.state().display_time, NOW + 42);
        assert!(!tm.poll(t0 + TICK_INTERVAL + Duration::from_millis(999)));
        assert!(tm.poll(t0 + TICK_INTERVAL * 2));
    }

    #[test]
    fn test_signal_publishes_changes() {
        let (tm, _, _) = mount(TimeMachineConfig::new());
        let seen = Rc::new(RefCell::new(vec![]));
        tm.signal().subscribe({
            let seen = seen.clone();
            move |s: &WidgetState| seen.borrow_mut().push(s.mode)
        });
        tm.set_mode(Mode::Frozen);
        tm.set_mode(Mode::Flowing);
        assert_eq!(*seen.borrow(), vec![Mode::Frozen, Mode::Flowing]);
    }

    #[test]
    fn test_unmount_returns_to_present_once() {
        let (tm, clock, _) = mount(TimeMachineConfig::new());
        travel_frozen(&tm);

        tm.unmount();
        tm.unmount();
        assert!(!tm.is_mounted());
        assert_eq!(clock.calls().iter().filter(|c| *c == "return").count(), 1);

        drop(tm);
        assert_eq!(clock.calls().iter().filter(|c| *c == "return").count(), 1);
    }

    #[test]
    fn test_drop_unmounts() {
        let (tm, clock, _) = mount(TimeMachineConfig::new());
        travel_frozen(&tm);
        let ctx = tm.context();
        drop(tm);

        assert!(!clock.is_active());
        // Handlers outliving the widget do nothing.
        (ctx.activate)();
        assert!(!clock.is_active());
    }

    #[test]
    fn test_active_tab_must_exist() {
        let (tm, _, _) = mount(
            TimeMachineConfig::new()
                .plugin(Plugin::new("Network").panel(|| Element::new("p").child("net")))
                .plugin(Plugin::new("headless")),
        );
        tm.set_active_tab("Network");
        assert_eq!(tm.state().active_tab, "Network");
        tm.set_active_tab("headless");
        assert_eq!(tm.state().active_tab, "Network");
        tm.set_active_tab("missing");
        assert_eq!(tm.state().active_tab, "Network");
        tm.set_active_tab(CORE_TAB);
        assert_eq!(tm.state().active_tab, CORE_TAB);
    }

    #[test]
    fn test_render_inactive_widget() {
        let (tm, _, _) = mount(TimeMachineConfig::new().position(Position::TopLeft));
        let view = tm.render().unwrap();

        assert!(view.has_class("time-machine-widget"));
        assert!(view.has_class("position-top-left"));
        let bar = by_class(&view, "time-machine-status-bar");
        assert_eq!(bar.text_content(), "● Real time");
        assert!(bar.find_by_class("time-machine-status-bar-inactive").is_some());
        assert!(by_class(&view, "time-machine-panel").has_class("time-machine-panel-hidden"));
        assert!(view.find_by_class("time-machine-button-reset").is_none());
        assert!(view.find_by_class("time-machine-tabs").is_none());
    }

    #[test]
    fn test_render_wires_handlers() {
        let (tm, clock, _) = mount(TimeMachineConfig::new());
        let view = tm.render().unwrap();

        by_class(&view, "time-machine-status-bar").dispatch("onClick", &[]);
        assert!(tm.state().expanded);

        let view = tm.render().unwrap();
        assert!(!by_class(&view, "time-machine-panel").has_class("time-machine-panel-hidden"));
        by_class(&view, "time-machine-input").dispatch("onChange", &[Primitive::from(TARGET)]);
        assert_eq!(tm.state().input_time, TARGET);

        let frozen = view
            .find(&|e| e.props.text("key") == Some("frozen"))
            .expect("frozen option");
        frozen.dispatch("onClick", &[]);
        assert_eq!(tm.state().mode, Mode::Frozen);

        by_class(&view, "time-machine-button").dispatch("onClick", &[]);
        assert_eq!(clock.travel.get(), Some((target(), Mode::Frozen)));

        let view = tm.render().unwrap();
        let bar = by_class(&view, "time-machine-status-bar");
        assert_eq!(bar.text_content(), format!("● Frozen: {TARGET}"));
        let reset = by_class(&view, "time-machine-button-reset");
        assert_eq!(reset.text_content(), "Return to present");
        reset.dispatch("onClick", &[]);
        assert!(!tm.state().active);
    }

    #[test]
    fn test_input_reflects_state() {
        let (tm, _, _) = mount(TimeMachineConfig::new().date_format("dd.MM.yyyy"));
        tm.set_input_time("01.02.2030");
        let el = components::input(&tm.context());
        let field = by_class(&el, "time-machine-input");
        assert_eq!(field.props.text("value"), Some("01.02.2030"));
        assert_eq!(field.props.text("placeholder"), Some("dd.MM.yyyy"));
        assert_eq!(el.text_content(), "Target Date/Time:");
    }

    #[test]
    fn test_tabs_and_plugin_panels() {
        let (tm, _, _) = mount(
            TimeMachineConfig::new()
                .plugin(Plugin::new("headless"))
                .plugin(
                    Plugin::new("Network")
                        .icon("🌐")
                        .panel(|| Element::new("p").child("net panel")),
                ),
        );
        let view = tm.render().unwrap();
        let tabs = by_class(&view, "time-machine-tabs");
        let labels: Vec<String> = tabs
            .find_all(&|e| e.has_class("time-machine-tab"))
            .iter()
            .map(|e| e.text_content())
            .collect();
        assert_eq!(labels, vec!["Core".to_string(), "🌐Network".to_string()]);
        assert!(view.find_by_class("time-machine-core").is_some());

        let network = tabs
            .find(&|e| e.props.text("key") == Some("Network"))
            .expect("network tab");
        network.dispatch("onClick", &[]);
        assert_eq!(tm.state().active_tab, "Network");

        let view = tm.render().unwrap();
        assert!(view.find_by_class("time-machine-core").is_none());
        assert_eq!(
            by_class(&view, "time-machine-plugin-panel").text_content(),
            "net panel"
        );
        assert!(by_class(&view, "time-machine-tab-active").text_content().ends_with("Network"));
    }

    #[test]
    fn test_activate_button_as_child() {
        let (tm, clock, _) = mount(TimeMachineConfig::new());
        tm.set_input_time(TARGET);
        let clicked = Rc::new(Cell::new(false));
        let link = Element::new("a").props(
            Props::new()
                .class("link")
                .set("href", "#go")
                .on("onClick", {
                    let clicked = clicked.clone();
                    move |_| clicked.set(true)
                }),
        );

        let el = components::activate_button(&tm.context(), SlotProps::as_child(link)).unwrap();
        assert_eq!(el.tag, "a");
        assert_eq!(el.class_name(), Some("time-machine-button link"));
        assert_eq!(el.props.text("href"), Some("#go"));

        el.dispatch("onClick", &[]);
        assert!(clicked.get());
        assert_eq!(clock.travel.get(), Some((target(), Mode::Flowing)));
    }

    #[test]
    fn test_as_child_requires_one_element() {
        let (tm, _, _) = mount(TimeMachineConfig::new());
        let ctx = tm.context();

        let two = SlotProps {
            as_child: true,
            class: None,
            children: vec![Node::from(Element::new("a")), Node::from(Element::new("b"))],
        };
        assert_eq!(
            components::activate_button(&ctx, two).unwrap_err(),
            InvalidChildError::Many(2)
        );
        assert_eq!(
            components::panel(&ctx, SlotProps::as_child("text")).unwrap_err(),
            InvalidChildError::Text("text".into())
        );
        assert_eq!(
            components::panel(&ctx, SlotProps { as_child: true, ..SlotProps::new() }).unwrap_err(),
            InvalidChildError::Empty
        );
    }

    #[test]
    fn test_reset_button_hidden_while_inactive() {
        let (tm, _, _) = mount(TimeMachineConfig::new());
        let child = SlotProps::as_child(Element::new("a"));
        assert!(components::reset_button(&tm.context(), child.clone()).unwrap().is_none());

        travel_frozen(&tm);
        let el = components::reset_button(&tm.context(), child)
            .unwrap()
            .expect("visible while active");
        assert_eq!(el.tag, "a");
        assert_eq!(el.class_name(), Some("time-machine-button time-machine-button-reset"));
    }

    #[test]
    fn test_panel_as_child_merges_classes() {
        let (tm, _, _) = mount(TimeMachineConfig::new());
        let aside = Element::new("aside").props(Props::new().class("mine"));
        let el = components::panel(&tm.context(), SlotProps::as_child(aside).class("extra")).unwrap();
        assert_eq!(el.tag, "aside");
        assert_eq!(
            el.class_name(),
            Some("time-machine-panel time-machine-panel-hidden extra mine")
        );
    }

    #[test]
    fn test_translations_override() {
        let translations: Translations =
            serde_json::from_str(r#"{ "realTime": "Tempo real", "frozen": "Congelado" }"#).unwrap();
        assert_eq!(translations.flowing, "Flowing");

        let (tm, _, _) = mount(TimeMachineConfig::new().translations(translations));
        let view = tm.render().unwrap();
        assert_eq!(by_class(&view, "time-machine-status-bar").text_content(), "● Tempo real");

        travel_frozen(&tm);
        let text = components::status_text(&tm.context());
        assert_eq!(text, format!("● Congelado: {TARGET}"));
    }

    #[test]
    fn test_mode_round_trips_as_text() {
        assert_eq!("frozen".parse::<Mode>(), Ok(Mode::Frozen));
        assert_eq!(Mode::Flowing.to_string(), "flowing");
        assert!("paused".parse::<Mode>().is_err());
        assert_eq!(serde_json::to_string(&Mode::Frozen).unwrap(), r#""frozen""#);
        assert_eq!(serde_json::from_str::<Mode>(r#""flowing""#).unwrap(), Mode::Flowing);
    }

    #[test]
    fn test_primitive_button() {
        let plain = primitives::button(ButtonProps::new().child("Go")).unwrap();
        assert_eq!(plain.tag, "button");
        assert_eq!(plain.class_name(), Some("tm-button"));

        let danger = primitives::button(
            ButtonProps::new()
                .variant(Variant::Danger)
                .props(Props::new().class("wide")),
        )
        .unwrap();
        assert_eq!(danger.class_name(), Some("tm-button tm-button-danger wide"));
    }

    #[test]
    fn test_primitive_button_as_child_merges_refs() {
        let outer = NodeRef::cell();
        let inner = NodeRef::cell();
        let el = primitives::button(
            ButtonProps::new()
                .variant(Variant::Primary)
                .as_child()
                .node_ref(outer.clone())
                .child(Element::new("a").node_ref(inner.clone()).props(Props::new().class("x"))),
        )
        .unwrap();
        assert_eq!(el.tag, "a");
        assert_eq!(el.class_name(), Some("tm-button tm-button-primary x"));

        commit(&el, &mut 5);
        assert_eq!(outer.current(), Some(5));
        assert_eq!(inner.current(), Some(5));
    }

    #[test]
    fn test_other_primitives() {
        let l = primitives::label(Props::new(), vec![Node::from("Offset")]);
        assert_eq!((l.tag.as_str(), l.class_name()), ("label", Some("tm-label")));

        let i = primitives::text_input(Props::new().class("num").set("type", "number"));
        assert_eq!(i.class_name(), Some("tm-input num"));

        let s = primitives::select(Props::new(), [("utc", "UTC"), ("local", "Local")]);
        assert_eq!(s.class_name(), Some("tm-select"));
        assert_eq!(s.children.len(), 2);
        assert_eq!(s.text_content(), "UTCLocal");

        let d = primitives::divider(Props::new().class(""));
        assert_eq!(d.class_name(), Some("tm-divider"));
    }
}
