use dioxus::prelude::*;

#[component]
pub fn EmptyState(title: String, message: String, children: Element) -> Element {
    rsx! {
        div { class: "text-center py-12 bg-white border border-gray-200 rounded-md",
            h2 { class: "text-xl font-semibold text-gray-700 mb-2", "{title}" }
            p { class: "text-gray-500 mb-4", "{message}" }
            {children}
        }
    }
}
