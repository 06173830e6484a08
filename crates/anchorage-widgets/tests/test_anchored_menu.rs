//! Menus and selects anchored to controls in a live document.

#[cfg(test)]
mod tests {
    use anchorage::{
        AttachableController, ElementId, KeyCode, KeyEvent, Positioning, Rect,
        testing::{Harness, init_tracing, ms},
    };
    use anchorage_widgets::{
        CloseReason, Menu, MenuEvent, MenuItem, MenuOptions, Select, SelectEvent, SelectOptions,
    };
    use pretty_assertions::assert_eq;

    struct Page {
        h: Harness,
        trigger: ElementId,
        host: ElementId,
    }

    /// A trigger near the bottom of an 800x600 viewport and a menu host
    /// with three items.
    fn page() -> Page {
        init_tracing();
        let mut h = Harness::with_viewport(800.0, 600.0);
        let body = h.doc.body();
        let trigger = h.doc.create_element("button");
        h.doc.set_attribute(trigger, "id", "more").unwrap();
        h.doc.append_child(body, trigger).unwrap();
        h.doc.set_rect(trigger, Rect::new(100.0, 500.0, 80.0, 30.0)).unwrap();
        let host = h.doc.create_element("md-menu");
        h.doc.append_child(body, host).unwrap();
        h.doc.set_rect(host, Rect::new(0.0, 0.0, 160.0, 150.0)).unwrap();
        for label in ["Undo", "Redo", "Settings"] {
            let item = h.doc.create_item("md-menu-item", MenuItem::new(label));
            h.doc.append_child(host, item).unwrap();
        }
        Page { h, trigger, host }
    }

    fn fixed() -> MenuOptions {
        MenuOptions {
            positioning: Positioning::Fixed,
            quick: true,
            ..MenuOptions::default()
        }
    }

    #[tokio::test]
    async fn attached_control_anchors_a_flipping_menu() {
        let mut p = page();
        let mut attach = AttachableController::new(&mut p.h.doc, p.host);
        let change = attach.set_html_for(&mut p.h.doc, Some("more")).unwrap();
        assert_eq!(change.and_then(|c| c.next), Some(p.trigger));

        let mut menu = Menu::new(&mut p.h.doc, p.host, fixed()).unwrap();
        menu.set_anchor_element(attach.current_control());
        menu.show(&mut p.h).await.unwrap();

        let style = p.h.doc.style(p.host).unwrap();
        assert_eq!(style.px("inset-block-end"), Some(100.0));
        assert_eq!(style.px("left"), Some(100.0));
        assert_eq!(style.get("height"), None);
        assert_eq!(
            menu.take_events(),
            vec![MenuEvent::Opening, MenuEvent::Opened]
        );
    }

    #[tokio::test]
    async fn overflowing_menus_resize_instead_of_moving() {
        let mut p = page();
        let options = MenuOptions {
            anchor: Some("more".into()),
            has_overflow: true,
            no_vertical_flip: true,
            ..fixed()
        };
        let mut menu = Menu::new(&mut p.h.doc, p.host, options).unwrap();
        menu.show(&mut p.h).await.unwrap();
        let style = p.h.doc.style(p.host).unwrap();
        assert_eq!(style.px("inset-block-start"), Some(530.0));
        assert_eq!(style.px("height"), Some(70.0));

        menu.close(&mut p.h).unwrap();
        let mut moving = menu.options().clone();
        moving.has_overflow = false;
        menu.set_options(moving);
        menu.show(&mut p.h).await.unwrap();
        let style = p.h.doc.style(p.host).unwrap();
        assert_eq!(style.px("inset-block-start"), Some(450.0));
        assert_eq!(style.get("height"), None);
    }

    #[tokio::test]
    async fn navigation_and_typeahead_share_the_tab_stop() {
        let mut p = page();
        let options = MenuOptions {
            anchor: Some("more".into()),
            no_navigation_wrap: true,
            ..fixed()
        };
        let mut menu = Menu::new(&mut p.h.doc, p.host, options).unwrap();
        p.h.doc.focus(p.trigger);
        menu.show(&mut p.h).await.unwrap();
        let items = menu.items(&p.h.doc);

        let mut up = KeyEvent::new(KeyCode::Up);
        assert_eq!(menu.handle_keydown(&mut p.h, &mut up).unwrap(), None);
        assert_eq!(menu.active_item(&p.h.doc), Some(items[0]));

        let mut s = KeyEvent::new('s');
        assert_eq!(menu.handle_keydown(&mut p.h, &mut s).unwrap(), Some(items[2]));
        p.h.advance(ms(50));
        let mut up = KeyEvent::new(KeyCode::Up);
        assert_eq!(menu.handle_keydown(&mut p.h, &mut up).unwrap(), Some(items[1]));
        assert!(!menu.typeahead().is_typing_ahead());

        let mut esc = KeyEvent::new(KeyCode::Esc);
        menu.handle_keydown(&mut p.h, &mut esc).unwrap();
        assert_eq!(menu.close_reason(), Some(CloseReason::Escape));
        assert_eq!(p.h.doc.active_element(), Some(p.trigger));
    }

    #[tokio::test]
    async fn select_escape_keeps_the_value() {
        let mut p = page();
        for id in p.h.doc.children(p.host).to_vec() {
            p.h.doc.remove(id).unwrap();
        }
        for (label, value) in [("Small", "s"), ("Medium", "m"), ("Large", "l")] {
            let item = p.h.doc.create_item("md-select-option", MenuItem::option(label, value));
            p.h.doc.append_child(p.host, item).unwrap();
        }
        p.h.doc.focus(p.trigger);
        let mut select = Select::new(&mut p.h.doc, p.trigger, p.host, &SelectOptions::default()).unwrap();
        assert_eq!(select.value(&p.h.doc), "");

        let mut enter = KeyEvent::new(KeyCode::Enter);
        select.handle_keydown(&mut p.h, &mut enter).await.unwrap();
        assert!(select.menu().is_open());
        let options = select.options(&p.h.doc);
        assert_eq!(p.h.doc.active_element(), Some(options[0]));

        let mut esc = KeyEvent::new(KeyCode::Esc);
        select.handle_keydown(&mut p.h, &mut esc).await.unwrap();
        assert!(!select.menu().is_open());
        p.h.advance(ms(1000));
        select.poll(&mut p.h).unwrap();
        assert_eq!(
            select.menu_mut().take_events().last(),
            Some(&MenuEvent::Closed)
        );
        assert_eq!(select.value(&p.h.doc), "");
        assert!(select.take_events().is_empty());

        select.handle_keydown(&mut p.h, &mut KeyEvent::new('l')).await.unwrap();
        assert_eq!(select.value(&p.h.doc), "l");
        assert_eq!(select.take_events(), vec![SelectEvent::Input, SelectEvent::Change]);
    }
}
