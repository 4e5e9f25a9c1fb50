use crate::cli::RunArgs;
use crate::config::{self, RunSetup};
use crate::error::Result;
use crate::trajectory::{TrajectoryWriter, VirialWriter};
use crate::utils::progress::StepProgress;
use chiralbd::engine::fix::{ForceModifier, TimeIntegrator};
use chiralbd::engine::virial::VirialTally;
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::{debug, info};

pub fn run(args: RunArgs, quiet: bool) -> Result<()> {
    info!("Loading run description from {:?}", &args.config);
    let setup = config::build_run(&args)?;

    let trajectory = BufWriter::new(File::create(&args.output)?);
    let virial = args
        .virial
        .as_ref()
        .map(|path| File::create(path).map(BufWriter::new))
        .transpose()?;

    let progress = if quiet {
        StepProgress::hidden(setup.steps)
    } else {
        StepProgress::new(setup.steps)
    };

    println!(
        "Integrating {} particle(s) for {} step(s)...",
        setup.ids.len(),
        setup.steps
    );
    let summary = simulate(setup, trajectory, virial, &progress)?;
    progress.finish();

    println!(
        "✓ Integrated {} step(s), wrote {} frame(s) to {}",
        summary.steps,
        summary.frames,
        args.output.display()
    );
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub steps: u64,
}

/// Drives the kernels through the host step order and writes every output frame.
///
/// Per step: integrate, wrap into the box, clear forces, then apply force modifiers.
/// The virial is only accumulated on output steps.
pub fn simulate<T: Write, V: Write>(
    setup: RunSetup,
    trajectory: T,
    virial_out: Option<V>,
    progress: &StepProgress,
) -> Result<RunSummary> {
    let RunSetup {
        mut system,
        ids,
        mut integrator,
        mut propulsion,
        context,
        steps,
        output_every,
    } = setup;

    integrator.init(&system, &context)?;
    if let Some(force) = propulsion.as_mut() {
        force.init(&system)?;
    }

    let mut trajectory = TrajectoryWriter::new(trajectory);
    let mut virial_out = virial_out.map(VirialWriter::new);
    let mut tally = VirialTally::new();

    system.clear_forces();
    if let Some(force) = propulsion.as_mut() {
        force.setup(&mut system, Some(&mut tally));
    }
    trajectory.write_frame(0, &system, &ids)?;
    if let Some(out) = virial_out.as_mut() {
        out.write(0, &tally.global())?;
    }
    let mut frames = 1;

    for step in 1..=steps {
        let output_step = step % output_every == 0 || step == steps;

        integrator.initial_integrate(&mut system);
        system.remap_into_box();
        system.clear_forces();

        tally.reset();
        if let Some(force) = propulsion.as_mut() {
            let virial = output_step.then_some(&mut tally);
            force.post_force(&mut system, virial);
        }

        if output_step {
            trajectory.write_frame(step, &system, &ids)?;
            if let Some(out) = virial_out.as_mut() {
                out.write(step, &tally.global())?;
            }
            frames += 1;
            debug!(step, virial_trace = tally.global().trace(), "Wrote frame.");
        }
        progress.inc();
    }

    trajectory.flush()?;
    if let Some(out) = virial_out.as_mut() {
        out.flush()?;
    }

    info!(steps, frames, "Run finished.");
    Ok(RunSummary { frames, steps })
}
