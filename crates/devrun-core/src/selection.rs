use crate::workload::Workload;

/// Which workloads to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub backend: bool,
    pub frontend: bool,
}

impl Selection {
    /// Resolve the raw `--backend` / `--frontend` flags.
    ///
    /// Passing neither flag runs everything. Otherwise the flags are taken
    /// literally, so passing both is the same as passing none.
    pub fn resolve(backend: bool, frontend: bool) -> Self {
        if !backend && !frontend {
            return Self::all();
        }
        Self { backend, frontend }
    }

    pub fn all() -> Self {
        Self {
            backend: true,
            frontend: true,
        }
    }

    pub fn includes(&self, workload: Workload) -> bool {
        match workload {
            Workload::Backend => self.backend,
            Workload::Frontend => self.frontend,
        }
    }

    /// Selected workloads in spawn order.
    pub fn workloads(&self) -> Vec<Workload> {
        Workload::ALL
            .into_iter()
            .filter(|w| self.includes(*w))
            .collect()
    }
}
