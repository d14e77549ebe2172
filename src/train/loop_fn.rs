use std::mem;
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::Result;
use crate::network::{AsTarget, Network, Workspace};
use crate::optim::Optimizer;
use crate::train::epoch_stats::{BatchProgress, EpochStats};
use crate::train::observer::TrainObserver;
use crate::train::train_config::{TrainConfig, TASK_SIZE};

impl<O: Optimizer> Network<O> {
    /// Trains on `data_size` samples produced on demand.
    ///
    /// `input_fn(i)` yields the input of sample `i`; `output_fn(i, task)`
    /// yields its training signal (a target vector, a class label or a
    /// single-coordinate update), where `task` is the index of the worker
    /// processing it.
    ///
    /// Returns `Ok(false)` when a weight turned non-finite and training was
    /// stopped, `Ok(true)` when every epoch completed.
    pub fn train<I, T, FI, FO, B>(
        &mut self,
        data_size: usize,
        input_fn: FI,
        output_fn: FO,
        config: &TrainConfig,
        observer: &mut B,
    ) -> Result<bool>
    where
        I: AsRef<[f64]>,
        T: AsTarget,
        FI: Fn(usize) -> I + Sync,
        FO: Fn(usize, usize) -> T + Sync,
        B: TrainObserver<O> + ?Sized,
    {
        config.validate()?;
        self.check_usable()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.thread_count)
            .build()?;

        if config.reset_weights {
            self.init_weight();
        }
        self.layers.set_parallelize(config.batch_size < TASK_SIZE);
        self.optimizer_mut().reset();
        self.ensure_workspaces(config.thread_count);

        info!(
            "training '{}': {} samples, batch size {}, {} epochs, {} threads",
            self.name(),
            data_size,
            config.batch_size,
            config.epochs,
            config.thread_count
        );

        for epoch in 1..=config.epochs {
            let started = Instant::now();

            if self.optimizer().requires_hessian() {
                self.calc_hessian(data_size, &input_fn, config.hessian_sample_cap)?;
            }

            let mut batches = 0;
            for (batch, offset) in (0..data_size).step_by(config.batch_size).enumerate() {
                let size = config.batch_size.min(data_size - offset);
                if size == 1 {
                    self.train_once(offset, size, &input_fn, &output_fn, config.thread_count)?;
                } else {
                    pool.install(|| self.train_once(offset, size, &input_fn, &output_fn, config.thread_count))?;
                }
                batches += 1;
                observer.on_batch(self, &BatchProgress { epoch, batch, offset, size });

                if batch % config.divergence_check_interval == 0 && self.layers.is_any_weight_non_finite() {
                    warn!(
                        "detected non-finite weight in '{}' at epoch {} batch {}, stop learning",
                        self.name(),
                        epoch,
                        batch
                    );
                    return Ok(false);
                }
            }

            let stats = EpochStats {
                epoch,
                total_epochs: config.epochs,
                batches,
                samples: data_size,
                elapsed_ms: started.elapsed().as_millis() as u64,
            };
            debug!("epoch {}/{} done in {}ms", epoch, config.epochs, stats.elapsed_ms);
            observer.on_epoch(self, &stats);
        }

        info!("training '{}' finished", self.name());
        Ok(true)
    }

    /// Trains on parallel slices of inputs and training signals.
    ///
    /// Every sample is validated against the network's dimensions before
    /// the first weight is touched.
    pub fn fit<I, T, B>(
        &mut self,
        inputs: &[I],
        targets: &[T],
        config: &TrainConfig,
        observer: &mut B,
    ) -> Result<bool>
    where
        I: AsRef<[f64]> + Sync,
        T: AsTarget + Sync,
        B: TrainObserver<O> + ?Sized,
    {
        self.check_training_data(inputs, targets)?;
        self.train(
            inputs.len(),
            move |i| inputs[i].as_ref(),
            move |i, _| targets[i].as_target(),
            config,
            observer,
        )
    }

    /// One mini-batch of `size` samples starting at `offset`, followed by a
    /// single weight update.
    fn train_once<I, T, FI, FO>(
        &mut self,
        offset: usize,
        size: usize,
        input_fn: &FI,
        output_fn: &FO,
        thread_count: usize,
    ) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsTarget,
        FI: Fn(usize) -> I + Sync,
        FO: Fn(usize, usize) -> T + Sync,
    {
        if size == 1 {
            let mut workspaces = mem::take(&mut self.workspaces);
            let result = self.train_sample(offset, 0, input_fn, output_fn, &mut workspaces[0]);
            self.restore_workspaces(workspaces, result.is_err());
            result?;
            self.update_weights(1, 1);
            Ok(())
        } else {
            self.train_onebatch(offset, size, input_fn, output_fn, thread_count)
        }
    }

    /// Splits the batch into contiguous ranges, one per task. Each task
    /// accumulates into its own workspace; the merge and the update run
    /// after every task has finished.
    fn train_onebatch<I, T, FI, FO>(
        &mut self,
        offset: usize,
        size: usize,
        input_fn: &FI,
        output_fn: &FO,
        thread_count: usize,
    ) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsTarget,
        FI: Fn(usize) -> I + Sync,
        FO: Fn(usize, usize) -> T + Sync,
    {
        let tasks = size.min(thread_count);
        let per_task = size.div_ceil(tasks);
        let end = offset + size;

        let mut workspaces = mem::take(&mut self.workspaces);
        let this = &*self;
        let result = workspaces[..tasks]
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(task, ws)| -> Result<()> {
                let start = offset + task * per_task;
                let stop = end.min(start + per_task);
                for j in start..stop {
                    this.train_sample(j, task, input_fn, output_fn, ws)?;
                }
                Ok(())
            });
        self.restore_workspaces(workspaces, result.is_err());
        result?;

        self.update_weights(tasks, size);
        Ok(())
    }

    fn train_sample<I, T, FI, FO>(
        &self,
        index: usize,
        task: usize,
        input_fn: &FI,
        output_fn: &FO,
        ws: &mut Workspace,
    ) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsTarget,
        FI: Fn(usize) -> I,
        FO: Fn(usize, usize) -> T,
    {
        let input = input_fn(index);
        let target = output_fn(index, task);
        let output = self
            .fprop(input.as_ref(), ws)
            .map_err(|e| e.at_sample(index))?
            .to_vec();
        self.bprop(&output, target.as_target(), ws)
            .map_err(|e| e.at_sample(index))
    }

    /// Puts the workspaces back; after a failed batch the partial gradients
    /// are discarded so the next update starts clean.
    fn restore_workspaces(&mut self, mut workspaces: Vec<Workspace>, failed: bool) {
        if failed {
            workspaces.iter_mut().for_each(Workspace::clear_grads);
        }
        self.workspaces = workspaces;
    }

    /// Estimates the Hessian diagonal from the first `min(data_size, cap)`
    /// samples, averaged over that count.
    fn calc_hessian<I, FI>(&mut self, data_size: usize, input_fn: &FI, cap: usize) -> Result<()>
    where
        I: AsRef<[f64]>,
        FI: Fn(usize) -> I,
    {
        let size = data_size.min(cap);
        let mut hessian = mem::take(&mut self.hessian);
        hessian.iter_mut().for_each(|h| h.clear());
        if size == 0 {
            self.hessian = hessian;
            return Ok(());
        }

        let mut workspaces = mem::take(&mut self.workspaces);
        let result = (0..size).try_for_each(|i| {
            let ws = &mut workspaces[0];
            let output = self.fprop(input_fn(i).as_ref(), ws).map_err(|e| e.at_sample(i))?.to_vec();
            self.bprop_2nd(&output, ws, &mut hessian);
            Ok(())
        });
        self.workspaces = workspaces;

        for h in hessian.iter_mut() {
            h.divide(size as f64);
        }
        self.hessian = hessian;
        debug!("hessian estimated from {} samples", size);
        result
    }
}
