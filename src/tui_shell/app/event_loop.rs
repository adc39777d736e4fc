use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &Receiver<Event>,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        // Task results first, then at most one terminal event.
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
            if app.quit {
                return Ok(());
            }
        }

        if term::poll(Duration::from_millis(50)).context("poll")? {
            match term::read().context("read event")? {
                term::Event::Key(k) if k.kind == KeyEventKind::Press => {
                    app.handle_event(Event::Key(k))
                }
                term::Event::Resize(w, h) => app.handle_event(Event::Resize(w, h)),
                _ => {}
            }
        }
    }
}
