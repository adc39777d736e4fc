    use serde_json::json;

    use super::*;
    use crate::error::ErrorClass;
    use crate::model::{ActionKind, Preview};

    #[test]
    fn parses_a_valid_list_page() {
        let output = json!({
            "type": "list",
            "title": "Issues",
            "list": {
                "showPreview": true,
                "items": [{
                    "title": "Bug #1",
                    "subtitle": "open",
                    "actions": [{"type": "open-url", "url": "https://example.com/1"}],
                    "preview": {"command": "show", "with": {"n": 1}}
                }]
            }
        })
        .to_string();

        let page = parse_page(output.as_bytes()).unwrap();
        assert_eq!(page.title(), Some("Issues"));
        let Page::List { list, .. } = page else {
            panic!("expected a list page");
        };
        assert!(list.show_preview);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, None);
        assert!(matches!(
            &list.items[0].actions[0].kind,
            ActionKind::OpenUrl { url, application: None } if url == "https://example.com/1"
        ));
        assert!(matches!(&list.items[0].preview, Some(Preview::Command(spec)) if spec.command == "show"));
    }

    #[test]
    fn parses_a_detail_page_with_text_preview() {
        let page = parse_page(br#"{"type":"detail","detail":{"preview":{"text":"hello"}}}"#)
            .unwrap();
        assert_eq!(page.title(), None);
        let Page::Detail { detail, .. } = page else {
            panic!("expected a detail page");
        };
        assert_eq!(
            detail.preview,
            Preview::Text {
                text: "hello".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_json_output() {
        let err = parse_page(b"not json").unwrap_err();
        assert_eq!(err.class(), ErrorClass::Protocol);
        assert!(err.to_string().contains("not valid JSON"), "{}", err);
    }

    #[test]
    fn rejects_list_item_without_title() {
        let err = parse_page(br#"{"type":"list","list":{"items":[{"subtitle":"x"}]}}"#)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Protocol);
        assert!(err.to_string().starts_with("invalid page: "), "{}", err);
    }

    #[test]
    fn rejects_unknown_page_type() {
        let err = validate_page(&json!({"type": "form"})).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Protocol);
    }

    #[test]
    fn rejects_action_missing_its_payload() {
        let err = validate_page(&json!({
            "type": "detail",
            "detail": {
                "preview": {"text": "x"},
                "actions": [{"type": "copy-text"}]
            }
        }))
        .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Protocol);
    }

    #[test]
    fn run_command_action_keeps_bindings_and_success_override() {
        let page = parse_page(
            br#"{"type":"detail","detail":{"preview":{"text":"x"},"actions":[
                {"type":"run-command","command":"close","with":{"id":"7"},"onSuccess":"reload-page"}
            ]}}"#,
        )
        .unwrap();
        let Page::Detail { detail, .. } = page else {
            panic!("expected a detail page");
        };
        let ActionKind::RunCommand {
            command,
            with,
            on_success,
        } = &detail.actions[0].kind
        else {
            panic!("expected run-command");
        };
        assert_eq!(command, "close");
        assert_eq!(with["id"].value(), Some(&json!("7")));
        assert_eq!(*on_success, Some(crate::model::OnSuccess::ReloadPage));
    }
