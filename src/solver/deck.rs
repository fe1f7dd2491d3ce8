//! CalculiX input deck rendering

use crate::dof;
use crate::job::{JobDescriptor, MemoryPolicy};

/// Element labels per `*ELSET` data line
const LABELS_PER_LINE: usize = 16;

/// Render `job` as a CalculiX `.inp` deck
///
/// Node and element labels are 1-based. Concentrated loads are written from
/// the per-node sums so repeated rows on one direction add up.
pub fn render(job: &JobDescriptor) -> String {
    let model = &job.model;
    let step = &job.step;
    let mut inp = String::new();

    // 1. Header
    inp.push_str("*HEADING\n");
    inp.push_str(&format!("{} ({})\n", job.names.job, job.names.model));
    if !job.execution.description.is_empty() {
        inp.push_str(&format!("** {}\n", job.execution.description));
    }
    let memory = match job.execution.memory {
        MemoryPolicy::Percentage(p) => format!("{}%", p),
        MemoryPolicy::Megabytes(mb) => format!("{} MB", mb),
    };
    inp.push_str(&format!(
        "** precision={:?} output={:?} memory={} cpus={} gpus={}\n",
        job.execution.precision,
        job.execution.nodal_output_precision,
        memory,
        job.execution.num_cpus,
        job.execution.num_gpus
    ));

    // 2. Nodes
    inp.push_str("*NODE, NSET=NALL\n");
    for node in model.nodes() {
        let [x, y, z] = node.coords();
        inp.push_str(&format!("{}, {:e}, {:e}, {:e}\n", node.id, x, y, z));
    }

    // 3. Elements, one set per section
    for section in model.sections() {
        inp.push_str(&format!(
            "*ELEMENT, TYPE={}, ELSET={}\n",
            job.element_type, section.name
        ));
        for &idx in &section.elements {
            let element = &model.elements()[idx];
            inp.push_str(&format!(
                "{}, {}, {}\n",
                element.label(),
                element.start,
                element.end
            ));
        }
    }

    inp.push_str("*ELSET, ELSET=EALL\n");
    let labels: Vec<String> = model
        .elements()
        .iter()
        .map(|e| e.label().to_string())
        .collect();
    for chunk in labels.chunks(LABELS_PER_LINE) {
        inp.push_str(&chunk.join(", "));
        inp.push_str("\n");
    }

    // 4. Materials
    for material in model.materials() {
        inp.push_str(&format!("*MATERIAL, NAME={}\n", material.name));
        inp.push_str("*ELASTIC\n");
        inp.push_str(&format!("{:e}, {}\n", material.e, material.nu));
        inp.push_str("*DENSITY\n");
        inp.push_str(&format!("{:e}\n", material.density));
    }

    // 5. Sections
    for section in model.sections() {
        inp.push_str(&format!(
            "*SOLID SECTION, ELSET={}, MATERIAL={}\n",
            section.name, section.material
        ));
        inp.push_str(&format!("{:e}\n", section.area));
    }

    // 6. Step
    if step.nlgeom {
        inp.push_str("*STEP, NLGEOM\n");
    } else {
        inp.push_str("*STEP\n");
    }
    inp.push_str("*STATIC\n");
    inp.push_str(&format!(
        "{:e}, {:e}, {:e}, {:e}\n",
        step.initial_increment, step.time_period, step.min_increment, step.max_increment
    ));

    // 7. Boundary conditions
    if !job.restraints.is_empty() {
        inp.push_str("*BOUNDARY\n");
        for restraint in &job.restraints {
            inp.push_str(&format!("** {}\n", restraint.name));
            for (component, value) in dof::set_components(&restraint.components) {
                let dof = component + 1;
                inp.push_str(&format!("{}, {}, {}, {:e}\n", restraint.node, dof, dof, value));
            }
        }
    }

    // 8. Concentrated loads
    if !job.effective_loads.is_empty() {
        inp.push_str("*CLOAD\n");
        for load in &job.effective_loads {
            inp.push_str(&format!("** {}\n", load.sources.join(" + ")));
            for (component, value) in dof::set_components(&load.components) {
                inp.push_str(&format!("{}, {}, {:e}\n", load.node, component + 1, value));
            }
        }
    }

    // 9. Output requests
    if !job.outputs.nodal.is_empty() {
        inp.push_str("*NODE PRINT, NSET=NALL\n");
        inp.push_str(&format!("{}\n", job.outputs.nodal.join(", ")));
    }
    if !job.outputs.element.is_empty() {
        inp.push_str("*EL PRINT, ELSET=EALL\n");
        inp.push_str(&format!("{}\n", job.outputs.element.join(", ")));
    }

    inp.push_str("*END STEP\n");
    inp
}
