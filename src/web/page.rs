//! Embedded browser viewer page.
//!
//! The page owns everything scoped out of the Rust core: camera capture,
//! WebGL rendering, and viewport resize. It draws the scene snapshots
//! arriving on the SSE stream over the live camera feed.

use axum::response::Html;

/// Serve the viewer page
pub async fn viewer_page() -> Html<&'static str> {
    Html(VIEWER_HTML)
}

const VIEWER_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Adorna Try-On</title>
<style>
  html, body { margin: 0; height: 100%; overflow: hidden; background: #111; }
  #camera, #overlay { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; }
  #overlay { pointer-events: none; }
  #controls { position: absolute; bottom: 16px; left: 50%; transform: translateX(-50%); z-index: 2; }
  #controls button { margin: 0 4px; padding: 8px 18px; border: 0; border-radius: 16px;
                     font-size: 14px; cursor: pointer; color: #222; }
</style>
</head>
<body>
<video id="camera" autoplay muted playsinline></video>
<canvas id="overlay"></canvas>
<div id="controls">
  <button style="background:#d4af37" onclick="setFinish('gold')">Gold</button>
  <button style="background:#e6e6e6" onclick="setFinish('silver')">Silver</button>
  <button style="background:#b76e79" onclick="setFinish('rose')">Rose</button>
</div>
<script type="module">
import * as THREE from 'https://unpkg.com/three@0.160.0/build/three.module.js';

const canvas = document.getElementById('overlay');
const scene = new THREE.Scene();
const camera3d = new THREE.PerspectiveCamera(45, innerWidth / innerHeight, 0.01, 10);
camera3d.position.z = 1;

const renderer = new THREE.WebGLRenderer({ canvas, alpha: true, antialias: true });
renderer.setSize(innerWidth, innerHeight);
renderer.setPixelRatio(devicePixelRatio);

scene.add(new THREE.AmbientLight(0xffffff, 1.2));
const light = new THREE.DirectionalLight(0xffffff, 0.8);
light.position.set(0, 1, 1);
scene.add(light);

// One group per attachment side, keyed by the snapshot's side field
const groups = {};
function groupFor(att) {
  if (!groups[att.side]) {
    const group = new THREE.Group();
    for (const surface of att.surfaces) {
      group.add(new THREE.Mesh(
        new THREE.SphereGeometry(1, 24, 24),
        new THREE.MeshStandardMaterial()
      ));
    }
    scene.add(group);
    groups[att.side] = group;
  }
  return groups[att.side];
}

function applySnapshot(snapshot) {
  for (const att of snapshot.attachments) {
    const group = groupFor(att);
    group.position.set(...att.position);
    group.scale.setScalar(att.scale);
    group.rotation.z = att.roll;
    group.visible = att.visible;
    group.children.forEach((mesh, i) => {
      const mat = att.surfaces[i].material;
      mesh.material.color.setRGB(...mat.base_color);
      mesh.material.metalness = mat.metalness;
      mesh.material.roughness = mat.roughness;
    });
  }
}

const events = new EventSource('/api/stream');
events.addEventListener('scene', (e) => applySnapshot(JSON.parse(e.data)));

window.setFinish = (finish) => {
  fetch('/api/finish', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ finish }),
  });
};

navigator.mediaDevices.getUserMedia({ video: true }).then((stream) => {
  document.getElementById('camera').srcObject = stream;
});

addEventListener('resize', () => {
  camera3d.aspect = innerWidth / innerHeight;
  camera3d.updateProjectionMatrix();
  renderer.setSize(innerWidth, innerHeight);
});

function animate() {
  requestAnimationFrame(animate);
  renderer.render(scene, camera3d);
}
animate();
</script>
</body>
</html>
"#;
