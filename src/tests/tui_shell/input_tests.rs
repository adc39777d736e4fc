    use super::*;

    #[test]
    fn edits_at_the_cursor_on_char_boundaries() {
        let mut input = Input::with_value("héllo");
        input.move_left();
        input.move_left();
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor_col(), 1);
        input.delete();
        assert_eq!(input.buf, "hllo");
        input.insert_char('é');
        assert_eq!(input.buf, "héllo");
        input.backspace();
        input.backspace();
        assert_eq!(input.buf, "llo");
        assert_eq!(input.cursor, 0);
        input.backspace();
        assert_eq!(input.buf, "llo");
    }

    #[test]
    fn movement_stops_at_the_ends() {
        let mut input = Input::with_value("ab");
        input.move_right();
        assert_eq!(input.cursor, 2);
        input.delete();
        assert_eq!(input.buf, "ab");
        input.clear();
        input.move_left();
        assert_eq!(input.cursor, 0);
        assert_eq!(input.cursor_col(), 0);
    }
