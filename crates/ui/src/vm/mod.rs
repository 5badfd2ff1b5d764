mod report_vm;
mod sheet_vm;

pub use report_vm::{ReportVm, map_report};
pub use sheet_vm::{
    BubbleClick, BubbleVm, CHOICE_OPTIONS, MainAction, RowVm, SheetIntent, SheetVm, map_sheet,
    run_intent,
};
