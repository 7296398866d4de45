//! Embedded browser pages. Each page carries its own script; the shared
//! shell holds the stylesheet. The scripts own the client half of the
//! workflow: the session guard redirect, the form drafts, and the local
//! list reconciliation after each mutation.

pub fn login_page() -> String {
    render_page("Log in", LOGIN_BODY, LOGIN_JS)
}

pub fn signup_page() -> String {
    render_page("Sign up", SIGNUP_BODY, SIGNUP_JS)
}

pub fn dashboard_page() -> String {
    render_page("Mood Tracker", DASHBOARD_BODY, DASHBOARD_JS)
}

pub fn worksheets_page() -> String {
    render_page("CBT Worksheets", WORKSHEETS_BODY, WORKSHEETS_JS)
}

fn render_page(title: &str, body: &str, script: &str) -> String {
    PAGE_SHELL
        .replace("{{TITLE}}", title)
        .replace("{{BODY}}", body)
        .replace("{{SCRIPT}}", script)
}

const PAGE_SHELL: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg-1: #eef4f2;
      --bg-2: #cfe3dd;
      --ink: #27303a;
      --accent: #2f7d6d;
      --accent-2: #35556b;
      --danger: #c63b2b;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 18px 48px rgba(53, 85, 107, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 65%),
        linear-gradient(150deg, var(--bg-1), #f4f8f0 70%, #eef4f2 100%);
      color: var(--ink);
      font-family: 'Trebuchet MS', 'Segoe UI', sans-serif;
      padding: 0 0 48px;
    }

    .topbar {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 18px 28px;
      background: var(--card);
      border-bottom: 1px solid rgba(53, 85, 107, 0.12);
    }

    .topbar h1 {
      margin: 0;
      font-size: 1.4rem;
    }

    .session-nav {
      display: flex;
      align-items: center;
      gap: 14px;
    }

    .session-nav a {
      color: var(--accent-2);
      font-weight: 600;
      text-decoration: none;
    }

    .user-email {
      color: #667480;
      font-size: 0.9rem;
    }

    .app {
      width: min(860px, calc(100% - 36px));
      margin: 28px auto 0;
      display: grid;
      gap: 22px;
    }

    .auth-card {
      width: min(420px, calc(100% - 36px));
      margin: 10vh auto 0;
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 16px;
    }

    .auth-card h1 {
      margin: 0;
      text-align: center;
      font-size: 1.5rem;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      border: 1px solid rgba(53, 85, 107, 0.1);
      box-shadow: var(--shadow);
      padding: 22px;
    }

    .form-grid {
      display: grid;
      gap: 14px;
    }

    label {
      display: block;
      font-size: 0.85rem;
      font-weight: 600;
      color: #4b5763;
      margin-bottom: 4px;
    }

    input[type='text'],
    input[type='email'],
    input[type='password'],
    input[type='date'],
    select,
    textarea {
      width: 100%;
      padding: 10px 12px;
      border: 1px solid rgba(53, 85, 107, 0.25);
      border-radius: 10px;
      font: inherit;
      color: var(--ink);
      background: white;
    }

    textarea {
      min-height: 64px;
      resize: vertical;
    }

    input[type='range'] {
      width: 100%;
      accent-color: var(--accent);
    }

    .field-row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font: inherit;
      font-weight: 600;
      cursor: pointer;
      transition: transform 120ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button:disabled {
      opacity: 0.5;
      cursor: wait;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 22px rgba(47, 125, 109, 0.3);
    }

    .btn-secondary {
      background: var(--accent-2);
      color: white;
    }

    .btn-ghost {
      background: rgba(53, 85, 107, 0.08);
      color: var(--accent-2);
    }

    .btn-danger {
      background: rgba(198, 59, 43, 0.1);
      color: var(--danger);
    }

    .entry-card {
      background: white;
      border: 1px solid rgba(53, 85, 107, 0.12);
      border-radius: 14px;
      padding: 16px;
      margin-bottom: 12px;
      display: grid;
      gap: 8px;
    }

    .entry-date {
      color: #8a95a0;
      font-size: 0.8rem;
    }

    .entry-field .label {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8a95a0;
      display: block;
    }

    .entry-actions {
      display: flex;
      gap: 8px;
      justify-content: flex-end;
    }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      gap: 6px;
      padding: 6px;
      background: rgba(53, 85, 107, 0.08);
      border-radius: 999px;
    }

    .tab {
      background: transparent;
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      color: #5d6a76;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(53, 85, 107, 0.12);
    }

    .chart-card {
      background: white;
      border-radius: 16px;
      border: 1px solid rgba(53, 85, 107, 0.1);
      padding: 14px;
    }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(53, 85, 107, 0.12);
    }

    .chart-label {
      fill: #7a8691;
      font-size: 11px;
    }

    .status {
      min-height: 1.2em;
      font-size: 0.95rem;
      color: #5d6a76;
    }

    .status[data-type='error'] {
      color: var(--danger);
    }

    .status[data-type='ok'] {
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #76828d;
      font-size: 0.9rem;
    }

    .auth-footer {
      text-align: center;
      font-size: 0.9rem;
      color: #76828d;
    }

    .auth-footer a {
      color: var(--accent);
      font-weight: 600;
    }

    h2 {
      margin: 0 0 10px;
      font-size: 1.15rem;
    }

    .worksheet-item {
      border: 1px solid rgba(53, 85, 107, 0.14);
      border-radius: 12px;
      padding: 14px;
      margin-bottom: 12px;
      display: grid;
      gap: 10px;
    }

    .worksheet-item-head {
      display: flex;
      justify-content: space-between;
      align-items: center;
      font-weight: 600;
      color: #4b5763;
    }
  </style>
</head>
<body>
{{BODY}}
  <script>
{{SCRIPT}}
  </script>
</body>
</html>
"##;

const LOGIN_BODY: &str = r##"  <div class="auth-card">
    <h1>Log in to Mood Tracker</h1>
    <form id="auth-form" class="form-grid">
      <div>
        <label for="email">Email</label>
        <input type="email" id="email" required autocomplete="email" />
      </div>
      <div>
        <label for="password">Password</label>
        <input type="password" id="password" required autocomplete="current-password" />
      </div>
      <div class="status" id="status"></div>
      <button class="btn-primary" id="submit-btn" type="submit">Log in</button>
    </form>
    <p class="auth-footer">Need an account? <a href="/signup">Sign up</a></p>
  </div>
"##;

const LOGIN_JS: &str = r##"    const form = document.getElementById('auth-form');
    const statusEl = document.getElementById('status');
    const submitBtn = document.getElementById('submit-btn');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      statusEl.textContent = '';
      statusEl.dataset.type = '';
      submitBtn.disabled = true;
      submitBtn.textContent = 'Logging in...';
      try {
        const res = await fetch('/api/auth/login', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            email: document.getElementById('email').value,
            password: document.getElementById('password').value
          })
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to log in');
        }
        window.location.replace('/dashboard');
      } catch (err) {
        statusEl.textContent = err.message;
        statusEl.dataset.type = 'error';
        submitBtn.disabled = false;
        submitBtn.textContent = 'Log in';
      }
    });
"##;

const SIGNUP_BODY: &str = r##"  <div class="auth-card">
    <h1>Sign up for Mood Tracker</h1>
    <form id="auth-form" class="form-grid">
      <div>
        <label for="email">Email</label>
        <input type="email" id="email" required autocomplete="email" />
      </div>
      <div>
        <label for="password">Password</label>
        <input type="password" id="password" required autocomplete="new-password" />
      </div>
      <div class="status" id="status"></div>
      <button class="btn-primary" id="submit-btn" type="submit">Sign up</button>
    </form>
    <p class="auth-footer">Already have an account? <a href="/login">Log in</a></p>
  </div>
"##;

const SIGNUP_JS: &str = r##"    const form = document.getElementById('auth-form');
    const statusEl = document.getElementById('status');
    const submitBtn = document.getElementById('submit-btn');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      statusEl.textContent = '';
      statusEl.dataset.type = '';
      submitBtn.disabled = true;
      submitBtn.textContent = 'Creating account...';
      try {
        const res = await fetch('/api/auth/signup', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({
            email: document.getElementById('email').value,
            password: document.getElementById('password').value
          })
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to sign up');
        }
        window.location.replace('/dashboard');
      } catch (err) {
        statusEl.textContent = err.message;
        statusEl.dataset.type = 'error';
        submitBtn.disabled = false;
        submitBtn.textContent = 'Sign up';
      }
    });
"##;

const DASHBOARD_BODY: &str = r##"  <header class="topbar">
    <h1>Mood Tracker</h1>
    <nav class="session-nav">
      <a href="/worksheets">Worksheets</a>
      <span class="user-email" id="user-email"></span>
      <button class="btn-ghost" id="signout-btn" type="button">Sign out</button>
    </nav>
  </header>

  <main class="app">
    <div class="status" id="status"></div>

    <div>
      <button class="btn-primary" id="toggle-form-btn" type="button">+ New Entry</button>
    </div>

    <form id="entry-form" class="card form-grid" hidden>
      <div>
        <label for="f-situation">Situation</label>
        <textarea id="f-situation" required placeholder="What happened? Where were you?"></textarea>
      </div>
      <div>
        <label for="f-thought">Automatic Thought</label>
        <textarea id="f-thought" required placeholder="What went through your mind?"></textarea>
      </div>
      <div class="field-row">
        <div>
          <label for="f-emotion">Emotion</label>
          <input type="text" id="f-emotion" required placeholder="e.g., Anxiety, Sadness" />
        </div>
        <div>
          <label for="f-intensity">Intensity: <span id="f-intensity-value">5</span>/10</label>
          <input type="range" id="f-intensity" min="1" max="10" value="5" />
        </div>
      </div>
      <div>
        <label for="f-distortion">Cognitive Distortion</label>
        <select id="f-distortion">
          <option value="">None / Not sure</option>
        </select>
      </div>
      <div>
        <label for="f-response">Rational Response</label>
        <textarea id="f-response" required placeholder="A more balanced way to think about this?"></textarea>
      </div>
      <div>
        <label for="f-outcome">Outcome</label>
        <textarea id="f-outcome" placeholder="How do you feel now?"></textarea>
      </div>
      <button class="btn-primary" id="save-btn" type="submit">Save Entry</button>
    </form>

    <section id="chart-area" hidden>
      <h2>Emotional intensity over time</h2>
      <div class="chart-card">
        <svg id="chart" viewBox="0 0 600 260" role="img" aria-label="Mood chart"></svg>
      </div>
    </section>

    <section>
      <h2>Past entries</h2>
      <p class="hint" id="empty-hint">No entries yet. Click "+ New Entry" to log your first thought record.</p>
      <div id="entries"></div>
    </section>
  </main>
"##;

const DASHBOARD_JS: &str = r##"    const DISTORTIONS = [
      'All-or-Nothing Thinking',
      'Overgeneralization',
      'Mental Filter',
      'Disqualifying the Positive',
      'Jumping to Conclusions',
      'Magnification or Minimization',
      'Emotional Reasoning',
      'Should Statements',
      'Labeling',
      'Personalization'
    ];

    const statusEl = document.getElementById('status');
    const entriesEl = document.getElementById('entries');
    const emptyHintEl = document.getElementById('empty-hint');
    const chartAreaEl = document.getElementById('chart-area');
    const chartEl = document.getElementById('chart');
    const formEl = document.getElementById('entry-form');
    const toggleFormBtn = document.getElementById('toggle-form-btn');
    const saveBtn = document.getElementById('save-btn');
    const distortionSelect = document.getElementById('f-distortion');
    const intensityInput = document.getElementById('f-intensity');
    const intensityValueEl = document.getElementById('f-intensity-value');

    let entries = [];
    let series = [];
    let editingId = null;
    let editDraft = {};

    DISTORTIONS.forEach((label) => {
      const option = document.createElement('option');
      option.value = label;
      option.textContent = label;
      distortionSelect.appendChild(option);
    });

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const escapeHtml = (value) =>
      String(value).replace(/[&<>"']/g, (ch) => ({
        '&': '&amp;',
        '<': '&lt;',
        '>': '&gt;',
        '"': '&quot;',
        "'": '&#39;'
      }[ch]));

    const guard = async () => {
      const res = await fetch('/api/session');
      if (!res.ok) {
        window.location.replace('/login');
        return false;
      }
      const info = await res.json();
      document.getElementById('user-email').textContent = info.email;
      return true;
    };

    const localSeries = () =>
      entries.map((entry) => ({
        date: entry.created_at.slice(0, 10),
        intensity: entry.emotion_intensity
      }));

    const refresh = async () => {
      const [entriesRes, seriesRes] = await Promise.all([
        fetch('/api/entries'),
        fetch('/api/entries/series')
      ]);
      if (!entriesRes.ok || !seriesRes.ok) {
        throw new Error('Unable to load entries');
      }
      entries = await entriesRes.json();
      series = await seriesRes.json();
      renderEntries();
      renderChart();
    };

    const defaultDraft = () => ({
      situation: '',
      automaticThought: '',
      emotion: '',
      emotionIntensity: 5,
      cognitiveDistortion: '',
      rationalResponse: '',
      outcome: ''
    });

    let draft = defaultDraft();

    const bindDraftField = (id, key) => {
      const input = document.getElementById(id);
      input.addEventListener('input', () => {
        draft[key] = input.type === 'range' ? Number(input.value) : input.value;
        if (key === 'emotionIntensity') {
          intensityValueEl.textContent = input.value;
        }
      });
    };

    bindDraftField('f-situation', 'situation');
    bindDraftField('f-thought', 'automaticThought');
    bindDraftField('f-emotion', 'emotion');
    bindDraftField('f-intensity', 'emotionIntensity');
    bindDraftField('f-distortion', 'cognitiveDistortion');
    bindDraftField('f-response', 'rationalResponse');
    bindDraftField('f-outcome', 'outcome');

    const resetDraft = () => {
      draft = defaultDraft();
      formEl.reset();
      intensityInput.value = '5';
      intensityValueEl.textContent = '5';
    };

    // submit() renames the draft's field names to the storage columns
    const buildPayload = () => ({
      situation: draft.situation,
      automatic_thought: draft.automaticThought,
      emotion: draft.emotion,
      emotion_intensity: Number(draft.emotionIntensity),
      cognitive_distortion: draft.cognitiveDistortion || null,
      rational_response: draft.rationalResponse,
      outcome: draft.outcome
    });

    formEl.addEventListener('submit', async (event) => {
      event.preventDefault();
      saveBtn.disabled = true;
      saveBtn.textContent = 'Saving...';
      try {
        const res = await fetch('/api/entries', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(buildPayload())
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to save entry');
        }
        resetDraft();
        formEl.hidden = true;
        toggleFormBtn.textContent = '+ New Entry';
        await refresh();
        setStatus('Entry saved', 'ok');
        setTimeout(() => setStatus('', ''), 2000);
      } catch (err) {
        // a failed insert leaves the draft untouched for correction
        setStatus(err.message, 'error');
      } finally {
        saveBtn.disabled = false;
        saveBtn.textContent = 'Save Entry';
      }
    });

    toggleFormBtn.addEventListener('click', () => {
      formEl.hidden = !formEl.hidden;
      toggleFormBtn.textContent = formEl.hidden ? '+ New Entry' : 'Cancel';
    });

    const beginEdit = (id) => {
      editingId = id;
      editDraft = {};
      renderEntries();
    };

    const cancelEdit = () => {
      editingId = null;
      editDraft = {};
      renderEntries();
    };

    const commitEdit = async (id) => {
      try {
        const res = await fetch('/api/entries/' + id, {
          method: 'PATCH',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(editDraft)
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to update entry');
        }
        const merged = await res.json();
        // optimistic overlay, no refetch
        entries = entries.map((entry) => (entry.id === id ? merged : entry));
        series = localSeries();
        editingId = null;
        editDraft = {};
        renderEntries();
        renderChart();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const removeEntry = async (id) => {
      if (!window.confirm('Delete this entry?')) {
        return;
      }
      try {
        const res = await fetch('/api/entries/' + id, { method: 'DELETE' });
        if (!res.ok) {
          throw new Error(await res.text() || 'Unable to delete entry');
        }
        // filter locally instead of a round-trip fetch
        entries = entries.filter((entry) => entry.id !== id);
        series = localSeries();
        renderEntries();
        renderChart();
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    const entryField = (label, value) =>
      '<div class="entry-field"><span class="label">' + label + '</span>' +
      escapeHtml(value) + '</div>';

    const editField = (label, field, value, kind) => {
      const safe = escapeHtml(value);
      let control;
      if (kind === 'textarea') {
        control = '<textarea data-field="' + field + '">' + safe + '</textarea>';
      } else if (kind === 'range') {
        control = '<input type="range" min="1" max="10" data-field="' + field +
          '" value="' + safe + '" />';
      } else if (kind === 'select') {
        const options = ['<option value="">None / Not sure</option>']
          .concat(DISTORTIONS.map((d) =>
            '<option value="' + d + '"' + (d === value ? ' selected' : '') + '>' +
            d + '</option>'))
          .join('');
        control = '<select data-field="' + field + '">' + options + '</select>';
      } else {
        control = '<input type="text" data-field="' + field + '" value="' + safe + '" />';
      }
      return '<div class="entry-field"><span class="label">' + label + '</span>' +
        control + '</div>';
    };

    const renderEntries = () => {
      emptyHintEl.hidden = entries.length > 0;
      entriesEl.innerHTML = entries
        .map((entry) => {
          const date = new Date(entry.created_at).toLocaleString();
          if (entry.id === editingId) {
            return '<div class="entry-card">' +
              '<span class="entry-date">' + escapeHtml(date) + '</span>' +
              editField('Situation', 'situation', entry.situation, 'textarea') +
              editField('Automatic Thought', 'automatic_thought', entry.automatic_thought, 'textarea') +
              editField('Emotion', 'emotion', entry.emotion, 'text') +
              editField('Intensity', 'emotion_intensity', entry.emotion_intensity, 'range') +
              editField('Cognitive Distortion', 'cognitive_distortion', entry.cognitive_distortion || '', 'select') +
              editField('Rational Response', 'rational_response', entry.rational_response, 'textarea') +
              editField('Outcome', 'outcome', entry.outcome, 'textarea') +
              '<div class="entry-actions">' +
              '<button class="btn-ghost" type="button" data-action="cancel" data-id="' + entry.id + '">Cancel</button>' +
              '<button class="btn-primary" type="button" data-action="save" data-id="' + entry.id + '">Save</button>' +
              '</div></div>';
          }
          return '<div class="entry-card">' +
            '<span class="entry-date">' + escapeHtml(date) + '</span>' +
            entryField('Situation', entry.situation) +
            entryField('Automatic Thought', entry.automatic_thought) +
            entryField('Emotion', entry.emotion + ' (' + entry.emotion_intensity + '/10)') +
            (entry.cognitive_distortion
              ? entryField('Cognitive Distortion', entry.cognitive_distortion)
              : '') +
            entryField('Rational Response', entry.rational_response) +
            (entry.outcome ? entryField('Outcome', entry.outcome) : '') +
            '<div class="entry-actions">' +
            '<button class="btn-ghost" type="button" data-action="edit" data-id="' + entry.id + '">Edit</button>' +
            '<button class="btn-danger" type="button" data-action="delete" data-id="' + entry.id + '">Delete</button>' +
            '</div></div>';
        })
        .join('');
    };

    entriesEl.addEventListener('click', (event) => {
      const button = event.target.closest('button[data-action]');
      if (!button) {
        return;
      }
      const id = Number(button.dataset.id);
      if (button.dataset.action === 'edit') {
        beginEdit(id);
      } else if (button.dataset.action === 'cancel') {
        cancelEdit();
      } else if (button.dataset.action === 'save') {
        commitEdit(id);
      } else if (button.dataset.action === 'delete') {
        removeEntry(id);
      }
    });

    entriesEl.addEventListener('input', (event) => {
      const field = event.target.dataset.field;
      if (!field || editingId === null) {
        return;
      }
      if (field === 'emotion_intensity') {
        editDraft[field] = Number(event.target.value);
      } else if (field === 'cognitive_distortion') {
        editDraft[field] = event.target.value || null;
      } else {
        editDraft[field] = event.target.value;
      }
    });

    const renderChart = () => {
      chartAreaEl.hidden = series.length === 0;
      if (series.length === 0) {
        chartEl.innerHTML = '';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 20;
      const min = 0;
      const max = 10;

      const xStep = series.length > 1 ? (width - paddingX * 2) / (series.length - 1) : 0;
      const scaleY = (height - top - paddingY) / (max - min);
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = series
        .map((point, index) =>
          (index === 0 ? 'M' : 'L') + ' ' + x(index).toFixed(2) + ' ' + y(point.intensity).toFixed(2))
        .join(' ');

      let grid = '';
      for (let value = min; value <= max; value += 2) {
        const yPos = y(value);
        grid += '<line class="chart-grid" x1="' + paddingX + '" y1="' + yPos +
          '" x2="' + (width - paddingX) + '" y2="' + yPos + '" />';
        grid += '<text class="chart-label" x="' + (paddingX - 10) + '" y="' + (yPos + 4) +
          '" text-anchor="end">' + value + '</text>';
      }

      const labelEvery = series.length > 8 ? Math.ceil(series.length / 8) : 1;
      const xLabels = series
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return '<text class="chart-label" x="' + x(index) + '" y="' + (height - paddingY + 18) +
            '" text-anchor="middle">' + point.date.slice(5) + '</text>';
        })
        .join('');

      const circles = series
        .map((point, index) =>
          '<circle class="chart-point" cx="' + x(index) + '" cy="' + y(point.intensity) + '" r="4" />')
        .join('');

      chartEl.innerHTML = grid + '<path class="chart-line" d="' + path + '" />' + circles + xLabels;
    };

    document.getElementById('signout-btn').addEventListener('click', async () => {
      await fetch('/api/auth/logout', { method: 'POST' });
      window.location.replace('/login');
    });

    guard().then((ok) => {
      if (ok) {
        refresh().catch((err) => setStatus(err.message, 'error'));
      }
    });
"##;

const WORKSHEETS_BODY: &str = r##"  <header class="topbar">
    <h1>CBT Worksheets</h1>
    <nav class="session-nav">
      <a href="/dashboard">Mood Tracker</a>
      <span class="user-email" id="user-email"></span>
      <button class="btn-ghost" id="signout-btn" type="button">Sign out</button>
    </nav>
  </header>

  <main class="app">
    <div class="status" id="status"></div>

    <div class="tabs" role="tablist">
      <button class="tab active" type="button" data-tab="thought-record" role="tab">Thought Record</button>
      <button class="tab" type="button" data-tab="activity-log" role="tab">Daily Activity Log</button>
      <button class="tab" type="button" data-tab="values-clarification" role="tab">Values Clarification</button>
      <button class="tab" type="button" data-tab="weekly-progress" role="tab">Weekly Progress</button>
    </div>

    <section class="card" id="panel-thought-record">
      <h2>Thought Record</h2>
      <p class="hint">Identify and challenge negative automatic thoughts.</p>
      <div class="form-grid" id="thought-record-form"></div>
    </section>

    <section class="card" id="panel-activity-log" hidden>
      <h2>Daily Activity Log</h2>
      <p class="hint">Track how different activities affect your mood.</p>
      <div class="form-grid">
        <div id="activities"></div>
        <button class="btn-ghost" id="add-activity-btn" type="button">+ Add Another Activity</button>
        <button class="btn-primary" id="save-activity-log-btn" type="button">Save Activity Log</button>
      </div>
    </section>

    <section class="card" id="panel-values-clarification" hidden>
      <h2>Values Clarification</h2>
      <p class="hint">Identify what matters most to you and how to live in alignment with your values.</p>
      <div class="form-grid">
        <div id="value-categories"></div>
        <button class="btn-primary" id="save-values-btn" type="button">Save Values</button>
      </div>
    </section>

    <section class="card" id="panel-weekly-progress" hidden>
      <h2>Weekly Progress Tracker</h2>
      <p class="hint">Reflect on your week and plan for the next one.</p>
      <div class="form-grid">
        <div>
          <label for="goal-1">Goal 1</label>
          <input type="text" id="goal-1" placeholder="Enter a goal for this week..." />
        </div>
        <div>
          <label for="goal-2">Goal 2</label>
          <input type="text" id="goal-2" placeholder="Enter a goal for this week..." />
        </div>
        <div>
          <label for="goal-3">Goal 3</label>
          <input type="text" id="goal-3" placeholder="Enter a goal for this week..." />
        </div>
        <div>
          <label for="achievements">Achievements This Week</label>
          <textarea id="achievements" placeholder="What did you accomplish? What went well?"></textarea>
        </div>
        <div>
          <label for="challenges">Challenges Faced</label>
          <textarea id="challenges" placeholder="What obstacles did you encounter?"></textarea>
        </div>
        <div>
          <label for="next-steps">Next Steps</label>
          <textarea id="next-steps" placeholder="What will you focus on next week?"></textarea>
        </div>
        <button class="btn-primary" id="save-progress-btn" type="button">Save Progress</button>
      </div>
    </section>
  </main>
"##;

const WORKSHEETS_JS: &str = r##"    const DISTORTIONS = [
      'All-or-Nothing Thinking',
      'Overgeneralization',
      'Mental Filter',
      'Disqualifying the Positive',
      'Jumping to Conclusions',
      'Magnification or Minimization',
      'Emotional Reasoning',
      'Should Statements',
      'Labeling',
      'Personalization'
    ];

    const DOMAINS = [
      'Work/School',
      'Family',
      'Social',
      'Self-Care',
      'Exercise',
      'Hobbies',
      'Rest',
      'Other'
    ];

    const VALUE_CATEGORIES = [
      { name: 'Family', description: 'Relationships with parents, siblings, children' },
      { name: 'Relationships', description: 'Friendships, romantic partnerships' },
      { name: 'Work/Career', description: 'Professional goals and growth' },
      { name: 'Education', description: 'Learning and personal development' },
      { name: 'Health', description: 'Physical and mental wellbeing' },
      { name: 'Spirituality', description: 'Faith, meaning, purpose' },
      { name: 'Community', description: 'Giving back, volunteering' },
      { name: 'Recreation', description: 'Fun, hobbies, leisure' }
    ];

    const statusEl = document.getElementById('status');
    const tabs = Array.from(document.querySelectorAll('.tab'));

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (message) {
        setTimeout(() => setStatus('', ''), 3000);
      }
    };

    const guard = async () => {
      const res = await fetch('/api/session');
      if (!res.ok) {
        window.location.replace('/login');
        return false;
      }
      const info = await res.json();
      document.getElementById('user-email').textContent = info.email;
      return true;
    };

    tabs.forEach((button) => {
      button.addEventListener('click', () => {
        tabs.forEach((tab) => tab.classList.toggle('active', tab === button));
        ['thought-record', 'activity-log', 'values-clarification', 'weekly-progress']
          .forEach((kind) => {
            document.getElementById('panel-' + kind).hidden = kind !== button.dataset.tab;
          });
      });
    });

    const submitWorksheet = async (kind, data, onSaved, savedMessage) => {
      try {
        const res = await fetch('/api/worksheets', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ kind: kind, data: data })
        });
        if (!res.ok) {
          throw new Error(await res.text() || 'Error saving. Please try again.');
        }
        onSaved();
        setStatus(savedMessage, 'ok');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    };

    // Thought record
    const thoughtFields = [
      { key: 'situation', label: 'Situation', kind: 'textarea', placeholder: 'Describe the situation that triggered the thought...' },
      { key: 'automaticThought', label: 'Automatic Thought', kind: 'textarea', placeholder: 'What thought went through your mind?' },
      { key: 'emotion', label: 'Emotion', kind: 'text', placeholder: 'e.g., Anxious, Sad, Angry' },
      { key: 'emotionIntensity', label: 'Intensity (1-10)', kind: 'range' },
      { key: 'evidenceFor', label: 'Evidence For the Thought', kind: 'textarea', placeholder: 'What facts support this thought?' },
      { key: 'evidenceAgainst', label: 'Evidence Against the Thought', kind: 'textarea', placeholder: 'What facts contradict this thought?' },
      { key: 'cognitiveDistortion', label: 'Cognitive Distortion', kind: 'select' },
      { key: 'balancedThought', label: 'Balanced Thought', kind: 'textarea', placeholder: 'Write a more balanced, realistic thought...' },
      { key: 'newEmotionIntensity', label: 'New Emotion Intensity (1-10)', kind: 'range' }
    ];

    const defaultThoughtRecord = () => ({
      situation: '',
      automaticThought: '',
      emotion: '',
      emotionIntensity: 5,
      evidenceFor: '',
      evidenceAgainst: '',
      cognitiveDistortion: '',
      balancedThought: '',
      newEmotionIntensity: 5
    });

    let thoughtRecord = defaultThoughtRecord();

    const buildThoughtForm = () => {
      const container = document.getElementById('thought-record-form');
      container.innerHTML = '';
      thoughtFields.forEach((field) => {
        const wrapper = document.createElement('div');
        const label = document.createElement('label');
        label.textContent = field.label;
        wrapper.appendChild(label);

        let control;
        if (field.kind === 'textarea') {
          control = document.createElement('textarea');
          control.placeholder = field.placeholder;
        } else if (field.kind === 'range') {
          control = document.createElement('input');
          control.type = 'range';
          control.min = '1';
          control.max = '10';
          control.value = '5';
          const valueEl = document.createElement('span');
          valueEl.textContent = ' 5/10';
          label.appendChild(valueEl);
          control.addEventListener('input', () => {
            valueEl.textContent = ' ' + control.value + '/10';
          });
        } else if (field.kind === 'select') {
          control = document.createElement('select');
          const blank = document.createElement('option');
          blank.value = '';
          blank.textContent = 'Select a distortion...';
          control.appendChild(blank);
          DISTORTIONS.forEach((d) => {
            const option = document.createElement('option');
            option.value = d;
            option.textContent = d;
            control.appendChild(option);
          });
        } else {
          control = document.createElement('input');
          control.type = 'text';
          control.placeholder = field.placeholder;
        }
        control.addEventListener('input', () => {
          thoughtRecord[field.key] =
            field.kind === 'range' ? Number(control.value) : control.value;
        });
        wrapper.appendChild(control);
        container.appendChild(wrapper);
      });

      const save = document.createElement('button');
      save.className = 'btn-primary';
      save.type = 'button';
      save.textContent = 'Save Thought Record';
      save.addEventListener('click', () => {
        const data = Object.assign({}, thoughtRecord);
        if (!data.cognitiveDistortion) {
          delete data.cognitiveDistortion;
        }
        submitWorksheet('thought-record', data, () => {
          thoughtRecord = defaultThoughtRecord();
          buildThoughtForm();
        }, 'Thought record saved!');
      });
      container.appendChild(save);
    };

    // Activity log
    const defaultActivity = () => ({
      domain: 'Work/School',
      hours: '',
      moodBefore: 5,
      moodAfter: 5
    });

    let activities = [defaultActivity()];

    const buildActivities = () => {
      const container = document.getElementById('activities');
      container.innerHTML = '';
      activities.forEach((activity, index) => {
        const item = document.createElement('div');
        item.className = 'worksheet-item';

        const head = document.createElement('div');
        head.className = 'worksheet-item-head';
        head.textContent = 'Activity ' + (index + 1);
        if (activities.length > 1) {
          const remove = document.createElement('button');
          remove.className = 'btn-danger';
          remove.type = 'button';
          remove.textContent = 'Remove';
          remove.addEventListener('click', () => {
            activities.splice(index, 1);
            buildActivities();
          });
          head.appendChild(remove);
        }
        item.appendChild(head);

        const row = document.createElement('div');
        row.className = 'field-row';

        const domainWrap = document.createElement('div');
        const domainLabel = document.createElement('label');
        domainLabel.textContent = 'Domain';
        const domainSelect = document.createElement('select');
        DOMAINS.forEach((d) => {
          const option = document.createElement('option');
          option.value = d;
          option.textContent = d;
          option.selected = d === activity.domain;
          domainSelect.appendChild(option);
        });
        domainSelect.addEventListener('input', () => {
          activity.domain = domainSelect.value;
        });
        domainWrap.appendChild(domainLabel);
        domainWrap.appendChild(domainSelect);
        row.appendChild(domainWrap);

        const hoursWrap = document.createElement('div');
        const hoursLabel = document.createElement('label');
        hoursLabel.textContent = 'Hours Spent';
        const hoursInput = document.createElement('input');
        hoursInput.type = 'text';
        hoursInput.placeholder = 'e.g., 2 hours';
        hoursInput.value = activity.hours;
        hoursInput.addEventListener('input', () => {
          activity.hours = hoursInput.value;
        });
        hoursWrap.appendChild(hoursLabel);
        hoursWrap.appendChild(hoursInput);
        row.appendChild(hoursWrap);
        item.appendChild(row);

        const moodRow = document.createElement('div');
        moodRow.className = 'field-row';
        [['moodBefore', 'Mood Before (1-10)'], ['moodAfter', 'Mood After (1-10)']]
          .forEach(([key, text]) => {
            const wrap = document.createElement('div');
            const label = document.createElement('label');
            const valueEl = document.createElement('span');
            label.textContent = text + ': ';
            valueEl.textContent = activity[key];
            label.appendChild(valueEl);
            const input = document.createElement('input');
            input.type = 'range';
            input.min = '1';
            input.max = '10';
            input.value = activity[key];
            input.addEventListener('input', () => {
              activity[key] = Number(input.value);
              valueEl.textContent = input.value;
            });
            wrap.appendChild(label);
            wrap.appendChild(input);
            moodRow.appendChild(wrap);
          });
        item.appendChild(moodRow);

        container.appendChild(item);
      });
    };

    document.getElementById('add-activity-btn').addEventListener('click', () => {
      activities.push(defaultActivity());
      buildActivities();
    });

    document.getElementById('save-activity-log-btn').addEventListener('click', () => {
      const data = {
        date: new Date().toISOString().slice(0, 10),
        activities: activities
      };
      submitWorksheet('activity-log', data, () => {
        activities = [defaultActivity()];
        buildActivities();
      }, 'Activity log saved!');
    });

    // Values clarification
    let valueRatings = {};

    const buildValueCategories = () => {
      const container = document.getElementById('value-categories');
      container.innerHTML = '';
      VALUE_CATEGORIES.forEach((category) => {
        const item = document.createElement('div');
        item.className = 'worksheet-item';

        const head = document.createElement('div');
        head.className = 'worksheet-item-head';
        head.textContent = category.name;
        item.appendChild(head);

        const description = document.createElement('p');
        description.className = 'hint';
        description.textContent = category.description;
        item.appendChild(description);

        const touch = () => {
          if (!valueRatings[category.name]) {
            valueRatings[category.name] = { importance: 5, action: '' };
          }
          return valueRatings[category.name];
        };

        const importanceLabel = document.createElement('label');
        const importanceValue = document.createElement('span');
        importanceLabel.textContent = 'Importance (1-10): ';
        importanceValue.textContent = '5';
        importanceLabel.appendChild(importanceValue);
        const importanceInput = document.createElement('input');
        importanceInput.type = 'range';
        importanceInput.min = '1';
        importanceInput.max = '10';
        importanceInput.value = '5';
        importanceInput.addEventListener('input', () => {
          touch().importance = Number(importanceInput.value);
          importanceValue.textContent = importanceInput.value;
        });
        item.appendChild(importanceLabel);
        item.appendChild(importanceInput);

        const actionLabel = document.createElement('label');
        actionLabel.textContent = 'One action I can take this week:';
        const actionInput = document.createElement('input');
        actionInput.type = 'text';
        actionInput.placeholder = 'Describe a small action...';
        actionInput.addEventListener('input', () => {
          touch().action = actionInput.value;
        });
        item.appendChild(actionLabel);
        item.appendChild(actionInput);

        container.appendChild(item);
      });
    };

    document.getElementById('save-values-btn').addEventListener('click', () => {
      submitWorksheet('values-clarification', valueRatings, () => {}, 'Values saved!');
    });

    // Weekly progress
    document.getElementById('save-progress-btn').addEventListener('click', () => {
      const data = {
        weeklyGoals: [
          document.getElementById('goal-1').value,
          document.getElementById('goal-2').value,
          document.getElementById('goal-3').value
        ],
        achievements: document.getElementById('achievements').value,
        challenges: document.getElementById('challenges').value,
        nextSteps: document.getElementById('next-steps').value
      };
      submitWorksheet('weekly-progress', data, () => {
        ['goal-1', 'goal-2', 'goal-3', 'achievements', 'challenges', 'next-steps']
          .forEach((id) => {
            document.getElementById(id).value = '';
          });
      }, 'Progress saved!');
    });

    document.getElementById('signout-btn').addEventListener('click', async () => {
      await fetch('/api/auth/logout', { method: 'POST' });
      window.location.replace('/login');
    });

    buildThoughtForm();
    buildActivities();
    buildValueCategories();
    guard();
"##;
