use opencv::highgui;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Rows of left-button clicks on the video window, queued until the loop drains them.
pub struct ClickQueue {
    rx: UnboundedReceiver<i32>,
}

impl ClickQueue {
    /// Every row clicked since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<i32> {
        let mut rows = Vec::new();
        while let Ok(y) = self.rx.try_recv() {
            rows.push(y);
        }
        rows
    }
}

fn forward_click(tx: &UnboundedSender<i32>, event: i32, y: i32) {
    if event == highgui::EVENT_LBUTTONDOWN {
        // The receiver only goes away when the loop has ended.
        let _ = tx.send(y);
    }
}

/// Hooks the mouse callback of `window` up to a new click queue.
pub fn install(window: &str) -> opencv::Result<ClickQueue> {
    let (tx, rx) = mpsc::unbounded_channel();
    highgui::set_mouse_callback(
        window,
        Some(Box::new(move |event, _x, y, _flags| forward_click(&tx, event, y))),
    )?;
    Ok(ClickQueue { rx })
}
