use dioxus::prelude::*;

use crate::vm::ReportVm;

#[component]
pub(super) fn ReportPanel(report: ReportVm) -> Element {
    rsx! {
        section { class: "results",
            h3 { "Results" }
            for line in report.lines() {
                p { class: "results__line", "{line}" }
            }
        }
    }
}
