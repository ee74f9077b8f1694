use dioxus::prelude::*;

#[component]
pub fn Loading(message: String) -> Element {
    rsx! {
        div { class: "flex justify-center items-center py-12",
            div { class: "animate-spin rounded-full h-10 w-10 border-b-2 border-blue-500" }
            p { class: "ml-4 text-gray-500", "{message}" }
        }
    }
}
