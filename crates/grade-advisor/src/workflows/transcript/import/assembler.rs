use super::parser::{RowKind, TranscriptRecord};
use crate::workflows::transcript::domain::{Element, Module, SessionOutcome};

/// Single-pass builder turning flat transcript rows into owned modules.
#[derive(Debug)]
pub(crate) struct TranscriptAssembler {
    state: AssemblyState,
    semester: Option<String>,
    modules: Vec<Module>,
    pub(crate) orphan_elements: usize,
    pub(crate) ignored_rows: usize,
}

#[derive(Debug)]
enum AssemblyState {
    AwaitingModule,
    InModule(Module),
}

impl TranscriptAssembler {
    pub(crate) fn new() -> Self {
        Self {
            state: AssemblyState::AwaitingModule,
            semester: None,
            modules: Vec::new(),
            orphan_elements: 0,
            ignored_rows: 0,
        }
    }

    pub(crate) fn push(&mut self, record: TranscriptRecord) {
        match record.kind {
            RowKind::Module => {
                self.close_module();
                let semester = record.semester.clone().or_else(|| self.semester.clone());
                let mut module = Module::new(
                    record.name,
                    record.session1_grade,
                    SessionOutcome::from_label(&record.session1_result),
                    record.session2_grade,
                    SessionOutcome::from_label(&record.session2_result),
                );
                module.semester = semester;
                self.state = AssemblyState::InModule(module);
            }
            RowKind::Element => match &mut self.state {
                AssemblyState::InModule(module) => module.elements.push(Element::new(
                    record.name,
                    record.session1_grade,
                    record.session2_grade,
                )),
                AssemblyState::AwaitingModule => {
                    tracing::debug!(element = %record.name, "element row outside a module skipped");
                    self.orphan_elements += 1;
                }
            },
            RowKind::Semester => {
                self.close_module();
                self.semester = record
                    .semester
                    .or_else(|| (!record.name.is_empty()).then_some(record.name));
            }
            RowKind::Other(code) => {
                tracing::debug!(row = %record.name, code = %code, "unrecognized row type skipped");
                self.ignored_rows += 1;
            }
        }
    }

    pub(crate) fn finish(mut self) -> Vec<Module> {
        self.close_module();
        self.modules
    }

    fn close_module(&mut self) {
        if let AssemblyState::InModule(module) =
            std::mem::replace(&mut self.state, AssemblyState::AwaitingModule)
        {
            self.modules.push(module);
        }
    }
}
