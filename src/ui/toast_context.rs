use dioxus::prelude::*;
use std::time::Duration;

const TOAST_DISMISS: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Alert,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Transient notification state. Failures are always surfaced here rather
/// than crashing a view.
#[derive(Clone, Copy)]
pub struct ToastContext {
    toasts: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
}

impl ToastContext {
    pub fn new() -> Self {
        Self {
            toasts: Signal::new(Vec::new()),
            next_id: Signal::new(0),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    pub fn alert(&self, message: impl Into<String>) {
        self.push(ToastKind::Alert, message.into());
    }

    fn push(&self, kind: ToastKind, message: String) {
        let mut next_id = self.next_id;
        let id = *next_id.peek() + 1;
        next_id.set(id);

        let mut toasts = self.toasts;
        toasts.write().push(Toast { id, kind, message });

        spawn(async move {
            tokio::time::sleep(TOAST_DISMISS).await;
            toasts.write().retain(|t| t.id != id);
        });
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Provider component making the toast context available throughout the app
/// and rendering the active toasts as an overlay
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let ctx = use_context_provider(ToastContext::new);
    let toasts = (ctx.toasts)();

    rsx! {
        {children}
        div { class: "fixed bottom-4 right-4 z-50 flex flex-col gap-2",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    class: match toast.kind {
                        ToastKind::Info => "rounded-md bg-gray-800 text-white px-4 py-2 text-sm shadow-lg",
                        ToastKind::Alert => "rounded-md bg-red-700 text-white px-4 py-2 text-sm shadow-lg",
                    },
                    "{toast.message}"
                }
            }
        }
    }
}

/// Hook to access the toast context
pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>()
}
